use serde::Serialize;

/// Regions the simulation backend knows about.
pub const REGIONS: [&str; 5] = ["US", "EU", "KR", "TW", "CN"];
/// Raid difficulties logs can be filtered by.
pub const DIFFICULTIES: [&str; 4] = ["lfr", "normal", "heroic", "mythic"];

pub const DEFAULT_REGION: &str = "US";
pub const DEFAULT_DIFFICULTY: &str = "heroic";
pub const DEFAULT_WEEKS: &str = "3";

/// The five values of the guild report form, as read when the trigger fired.
///
/// Field order is the order of the query parameters. Values are sent as-is,
/// an empty value becomes `key=` rather than being left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportRequest {
    pub region: String,
    pub weeks: String,
    pub difficulty: String,
    pub guild: String,
    pub realm: String,
}

impl ReportRequest {
    pub fn new(
        region: impl Into<String>,
        weeks: impl Into<String>,
        difficulty: impl Into<String>,
        guild: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            weeks: weeks.into(),
            difficulty: difficulty.into(),
            guild: guild.into(),
            realm: realm.into(),
        }
    }

    /// Things about this request the backend is unlikely to understand.
    ///
    /// Purely informational, nothing here stops the request from going out.
    pub fn advisories(&self) -> Vec<String> {
        let mut out = Vec::new();

        if !REGIONS.iter().any(|r| r.eq_ignore_ascii_case(&self.region)) {
            out.push(format!("Unknown region {:?}, expected one of {}", self.region, REGIONS.join(", ")));
        }
        if !DIFFICULTIES.iter().any(|d| d.eq_ignore_ascii_case(&self.difficulty)) {
            out.push(format!("Unknown difficulty {:?}, expected one of {}", self.difficulty, DIFFICULTIES.join(", ")));
        }
        if self.weeks.trim().parse::<u32>().is_err() {
            out.push(format!("Weeks {:?} is not a whole number", self.weeks));
        }
        if self.guild.trim().is_empty() {
            out.push("Guild name is empty".to_string());
        }
        if self.realm.trim().is_empty() {
            out.push("Realm is empty".to_string());
        }

        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn query_of(req: &ReportRequest) -> String {
        let built = reqwest::Client::new()
            .get("http://localhost/all_sims/")
            .query(req)
            .build()
            .unwrap();
        built.url().query().unwrap_or_default().to_string()
    }

    #[test]
    fn encodes_all_five_fields_in_order() {
        let req = ReportRequest::new("us", "4", "heroic", "Test Guild", "Area-52");
        assert_eq!(
            "region=us&weeks=4&difficulty=heroic&guild=Test+Guild&realm=Area-52",
            query_of(&req)
        );
    }

    #[test]
    fn empty_values_are_kept() {
        let req = ReportRequest::new("", "", "", "", "");
        assert_eq!("region=&weeks=&difficulty=&guild=&realm=", query_of(&req));
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let req = ReportRequest::new("US", "3", "mythic", "A&B=C", "Kel'Thuzad");
        let query = query_of(&req);
        assert!(query.contains("guild=A%26B%3DC"), "{}", query);
        assert!(query.contains("realm=Kel%27Thuzad"), "{}", query);
    }

    #[test]
    fn defaults_have_no_advisories_apart_from_names() {
        let req = ReportRequest::new(DEFAULT_REGION, DEFAULT_WEEKS, DEFAULT_DIFFICULTY, "Clutch", "Fizzcrank");
        assert!(req.advisories().is_empty());

        let lowercase = ReportRequest::new("eu", "10", "Mythic", "Clutch", "Fizzcrank");
        assert!(lowercase.advisories().is_empty());
    }

    #[test]
    fn odd_values_are_flagged() {
        let req = ReportRequest::new("Mars", "many", "hard", " ", "");
        assert_eq!(5, req.advisories().len());
    }
}
