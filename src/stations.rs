//! Đài xổ số: station gazetteer used by the bill parser, and the weekly
//! draw calendar.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    /// Miền Nam
    South,
    /// Miền Trung
    Central,
    /// Miền Bắc
    North,
}

#[derive(Debug)]
pub struct Station {
    pub name: &'static str,
    pub region: Region,
    /// Lowercase spellings and abbreviations seen on bills.
    pub aliases: &'static [&'static str],
}

pub const HA_NOI: &str = "HÀ NỘI";

// No "bd" / "bl" aliases: on bills they mean bao đảo and bao lô.
pub static STATIONS: &[Station] = &[
    Station { name: "TP.HCM", region: Region::South, aliases: &["tp.hcm", "tphcm", "tp hcm", "hcm", "sài gòn", "sai gon", "sg"] },
    Station { name: "ĐỒNG THÁP", region: Region::South, aliases: &["đồng tháp", "dong thap", "dt"] },
    Station { name: "CÀ MAU", region: Region::South, aliases: &["cà mau", "ca mau", "cm"] },
    Station { name: "BẾN TRE", region: Region::South, aliases: &["bến tre", "ben tre", "bt"] },
    Station { name: "VŨNG TÀU", region: Region::South, aliases: &["vũng tàu", "vung tau", "vt"] },
    Station { name: "BẠC LIÊU", region: Region::South, aliases: &["bạc liêu", "bac lieu"] },
    Station { name: "ĐỒNG NAI", region: Region::South, aliases: &["đồng nai", "dong nai"] },
    Station { name: "CẦN THƠ", region: Region::South, aliases: &["cần thơ", "can tho", "ct"] },
    Station { name: "SÓC TRĂNG", region: Region::South, aliases: &["sóc trăng", "soc trang", "st"] },
    Station { name: "TÂY NINH", region: Region::South, aliases: &["tây ninh", "tay ninh", "tn"] },
    Station { name: "AN GIANG", region: Region::South, aliases: &["an giang", "ag"] },
    Station { name: "BÌNH THUẬN", region: Region::South, aliases: &["bình thuận", "binh thuan", "bth"] },
    Station { name: "VĨNH LONG", region: Region::South, aliases: &["vĩnh long", "vinh long", "vl"] },
    Station { name: "BÌNH DƯƠNG", region: Region::South, aliases: &["bình dương", "binh duong"] },
    Station { name: "TRÀ VINH", region: Region::South, aliases: &["trà vinh", "tra vinh", "tv"] },
    Station { name: "LONG AN", region: Region::South, aliases: &["long an", "la"] },
    Station { name: "BÌNH PHƯỚC", region: Region::South, aliases: &["bình phước", "binh phuoc", "bp"] },
    Station { name: "HẬU GIANG", region: Region::South, aliases: &["hậu giang", "hau giang", "hg"] },
    Station { name: "TIỀN GIANG", region: Region::South, aliases: &["tiền giang", "tien giang", "tg"] },
    Station { name: "KIÊN GIANG", region: Region::South, aliases: &["kiên giang", "kien giang", "kg"] },
    Station { name: "ĐÀ LẠT", region: Region::South, aliases: &["đà lạt", "da lat", "dl", "lâm đồng", "lam dong", "ld"] },
    Station { name: "PHÚ YÊN", region: Region::Central, aliases: &["phú yên", "phu yen", "py"] },
    Station { name: "HUẾ", region: Region::Central, aliases: &["thừa thiên huế", "huế", "hue", "tth"] },
    Station { name: "ĐẮK LẮK", region: Region::Central, aliases: &["đắk lắk", "dak lak", "daklak"] },
    Station { name: "QUẢNG NAM", region: Region::Central, aliases: &["quảng nam", "quang nam", "qn"] },
    Station { name: "ĐÀ NẴNG", region: Region::Central, aliases: &["đà nẵng", "da nang", "dn"] },
    Station { name: "KHÁNH HÒA", region: Region::Central, aliases: &["khánh hòa", "khanh hoa", "kh"] },
    Station { name: "QUẢNG BÌNH", region: Region::Central, aliases: &["quảng bình", "quang binh", "qb"] },
    Station { name: "BÌNH ĐỊNH", region: Region::Central, aliases: &["bình định", "binh dinh"] },
    Station { name: "QUẢNG TRỊ", region: Region::Central, aliases: &["quảng trị", "quang tri", "qt"] },
    Station { name: "GIA LAI", region: Region::Central, aliases: &["gia lai", "gl"] },
    Station { name: "NINH THUẬN", region: Region::Central, aliases: &["ninh thuận", "ninh thuan", "nt"] },
    Station { name: "QUẢNG NGÃI", region: Region::Central, aliases: &["quảng ngãi", "quang ngai", "qng"] },
    Station { name: "ĐẮK NÔNG", region: Region::Central, aliases: &["đắk nông", "dak nong", "daknong"] },
    Station { name: "KON TUM", region: Region::Central, aliases: &["kon tum", "kt"] },
    Station { name: HA_NOI, region: Region::North, aliases: &["hà nội", "ha noi", "hn"] },
];

/// Finds a station by one of its aliases (case-insensitive).
pub fn lookup(alias: &str) -> Option<&'static Station> {
    let alias = alias.trim().to_lowercase();
    STATIONS.iter().find(|s| s.aliases.contains(&alias.as_str()))
}

/// Every alias, longest first so multi-word names win over abbreviations.
pub fn all_aliases() -> Vec<&'static str> {
    let mut aliases: Vec<&'static str> = STATIONS
        .iter()
        .flat_map(|s| s.aliases.iter().copied())
        .collect();
    aliases.sort_by_key(|a| std::cmp::Reverse(a.chars().count()));
    aliases
}

/// Stations drawing on `weekday` in `region`.
pub fn stations_on(region: Region, weekday: Weekday) -> &'static [&'static str] {
    match region {
        Region::South => match weekday {
            Weekday::Mon => &["TP.HCM", "ĐỒNG THÁP", "CÀ MAU"],
            Weekday::Tue => &["BẾN TRE", "VŨNG TÀU", "BẠC LIÊU"],
            Weekday::Wed => &["ĐỒNG NAI", "CẦN THƠ", "SÓC TRĂNG"],
            Weekday::Thu => &["TÂY NINH", "AN GIANG", "BÌNH THUẬN"],
            Weekday::Fri => &["VĨNH LONG", "BÌNH DƯƠNG", "TRÀ VINH"],
            Weekday::Sat => &["TP.HCM", "LONG AN", "BÌNH PHƯỚC", "HẬU GIANG"],
            Weekday::Sun => &["TIỀN GIANG", "KIÊN GIANG", "ĐÀ LẠT"],
        },
        Region::Central => match weekday {
            Weekday::Mon => &["PHÚ YÊN", "HUẾ"],
            Weekday::Tue => &["ĐẮK LẮK", "QUẢNG NAM"],
            Weekday::Wed => &["ĐÀ NẴNG", "KHÁNH HÒA", "QUẢNG BÌNH"],
            Weekday::Thu => &["BÌNH ĐỊNH", "QUẢNG TRỊ"],
            Weekday::Fri => &["GIA LAI", "NINH THUẬN"],
            Weekday::Sat => &["ĐÀ NẴNG", "QUẢNG NGÃI", "ĐẮK NÔNG"],
            Weekday::Sun => &["KON TUM", "KHÁNH HÒA", "HUẾ"],
        },
        Region::North => &[HA_NOI],
    }
}

pub fn stations_for_date(region: Region, date: NaiveDate) -> &'static [&'static str] {
    stations_on(region, date.weekday())
}
