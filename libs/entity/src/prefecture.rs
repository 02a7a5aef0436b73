use serde::Serialize;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct Prefecture {
    /// JIS X 0401 code, 1 (Hokkaido) through 47 (Okinawa).
    pub code: u8,
    pub slug: &'static str,
    pub name: &'static str,
    pub region: Region,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, strum::Display)]
pub enum Region {
    #[serde(rename = "北海道")]
    #[strum(serialize = "北海道")]
    Hokkaido,
    #[serde(rename = "東北")]
    #[strum(serialize = "東北")]
    Tohoku,
    #[serde(rename = "関東")]
    #[strum(serialize = "関東")]
    Kanto,
    #[serde(rename = "中部")]
    #[strum(serialize = "中部")]
    Chubu,
    #[serde(rename = "関西")]
    #[strum(serialize = "関西")]
    Kansai,
    #[serde(rename = "中国")]
    #[strum(serialize = "中国")]
    Chugoku,
    #[serde(rename = "四国")]
    #[strum(serialize = "四国")]
    Shikoku,
    #[serde(rename = "九州")]
    #[strum(serialize = "九州")]
    Kyushu,
    #[serde(rename = "沖縄")]
    #[strum(serialize = "沖縄")]
    Okinawa,
}

macro_rules! prefectures {
    ($(($code:literal, $slug:literal, $name:literal, $region:ident)),* $(,)?) => {
        const PREFECTURES: &[Prefecture] = &[
            $(Prefecture {
                code: $code,
                slug: $slug,
                name: $name,
                region: Region::$region,
            }),*
        ];
    };
}

prefectures![
    (1, "hokkaido", "北海道", Hokkaido),
    (2, "aomori", "青森県", Tohoku),
    (3, "iwate", "岩手県", Tohoku),
    (4, "miyagi", "宮城県", Tohoku),
    (5, "akita", "秋田県", Tohoku),
    (6, "yamagata", "山形県", Tohoku),
    (7, "fukushima", "福島県", Tohoku),
    (8, "ibaraki", "茨城県", Kanto),
    (9, "tochigi", "栃木県", Kanto),
    (10, "gunma", "群馬県", Kanto),
    (11, "saitama", "埼玉県", Kanto),
    (12, "chiba", "千葉県", Kanto),
    (13, "tokyo", "東京都", Kanto),
    (14, "kanagawa", "神奈川県", Kanto),
    (15, "niigata", "新潟県", Chubu),
    (16, "toyama", "富山県", Chubu),
    (17, "ishikawa", "石川県", Chubu),
    (18, "fukui", "福井県", Chubu),
    (19, "yamanashi", "山梨県", Chubu),
    (20, "nagano", "長野県", Chubu),
    (21, "gifu", "岐阜県", Chubu),
    (22, "shizuoka", "静岡県", Chubu),
    (23, "aichi", "愛知県", Chubu),
    (24, "mie", "三重県", Kansai),
    (25, "shiga", "滋賀県", Kansai),
    (26, "kyoto", "京都府", Kansai),
    (27, "osaka", "大阪府", Kansai),
    (28, "hyogo", "兵庫県", Kansai),
    (29, "nara", "奈良県", Kansai),
    (30, "wakayama", "和歌山県", Kansai),
    (31, "tottori", "鳥取県", Chugoku),
    (32, "shimane", "島根県", Chugoku),
    (33, "okayama", "岡山県", Chugoku),
    (34, "hiroshima", "広島県", Chugoku),
    (35, "yamaguchi", "山口県", Chugoku),
    (36, "tokushima", "徳島県", Shikoku),
    (37, "kagawa", "香川県", Shikoku),
    (38, "ehime", "愛媛県", Shikoku),
    (39, "kochi", "高知県", Shikoku),
    (40, "fukuoka", "福岡県", Kyushu),
    (41, "saga", "佐賀県", Kyushu),
    (42, "nagasaki", "長崎県", Kyushu),
    (43, "kumamoto", "熊本県", Kyushu),
    (44, "oita", "大分県", Kyushu),
    (45, "miyazaki", "宮崎県", Kyushu),
    (46, "kagoshima", "鹿児島県", Kyushu),
    (47, "okinawa", "沖縄県", Okinawa),
];

impl Prefecture {
    /// All prefectures ordered by code.
    pub fn all() -> &'static [Prefecture] {
        PREFECTURES
    }

    pub fn find_by_code(code: u8) -> Option<&'static Prefecture> {
        code.checked_sub(1)
            .and_then(|index| PREFECTURES.get(usize::from(index)))
    }

    pub fn find_by_slug(slug: &str) -> Option<&'static Prefecture> {
        PREFECTURES.iter().find(|p| p.slug == slug)
    }

    /// Resolves either a numeric code or a slug.
    pub fn lookup(key: &str) -> Option<&'static Prefecture> {
        match key.parse::<u8>() {
            Ok(code) => Self::find_by_code(code),
            Err(_) => Self::find_by_slug(&key.to_lowercase()),
        }
    }

    /// Prefectures whose name or slug contains `query`, ignoring case.
    /// An empty query matches everything.
    pub fn search(query: &str) -> Vec<&'static Prefecture> {
        let query = query.trim().to_lowercase();
        PREFECTURES
            .iter()
            .filter(|p| {
                query.is_empty()
                    || p.name.to_lowercase().contains(&query)
                    || p.slug.contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_catalogue_is_complete_and_ordered() {
        let all = Prefecture::all();

        assert_eq!(all.len(), 47);
        for (index, prefecture) in all.iter().enumerate() {
            assert_eq!(usize::from(prefecture.code), index + 1);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Prefecture::lookup("13").unwrap().slug, "tokyo");
        assert_eq!(Prefecture::lookup("Osaka").unwrap().name, "大阪府");
        assert_eq!(Prefecture::find_by_code(47).unwrap().slug, "okinawa");
        assert!(Prefecture::find_by_code(0).is_none());
        assert!(Prefecture::find_by_code(48).is_none());
        assert!(Prefecture::lookup("atlantis").is_none());
    }

    #[test]
    fn test_search() {
        let names: Vec<_> =
            Prefecture::search("京").iter().map(|p| p.slug).collect();
        assert_eq!(names, vec!["tokyo", "kyoto"]);

        assert_eq!(Prefecture::search("").len(), 47);
        assert_eq!(Prefecture::search("shima").len(), 5);
        assert_eq!(
            Prefecture::find_by_slug("kyoto").unwrap().region.to_string(),
            "関西"
        );
    }
}
