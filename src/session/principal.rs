use serde::{Deserialize, Serialize};

use super::assignment::de_string_list;

/// The authenticated user's profile as returned by the backend `user` object.
/// Discord fields are only meaningful while `discord_linked` is true; a stale
/// record with the flag down is treated as unlinked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub discord_linked: bool,
    #[serde(default)]
    pub discord_username: Option<String>,
    #[serde(default)]
    pub discord_nickname: Option<String>,
    #[serde(default)]
    pub discord_avatar: Option<String>,
    #[serde(default)]
    pub discord_highest_role: Option<String>,

    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub poles: Vec<String>,
    #[serde(default, deserialize_with = "de_string_list")]
    pub habilitations: Vec<String>,
    #[serde(default)]
    pub fjf: bool,
}

impl Principal {
    pub fn is_linked(&self) -> bool {
        self.discord_linked
    }

    /// Preferred display name: Discord nickname, then Discord username, then
    /// the portal username.
    pub fn display_identity(&self) -> &str {
        self.discord_nickname
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.discord_username.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_wire_form() {
        let p: Principal = serde_json::from_str(
            r#"{
                "id": "7",
                "username": "a.targaryen",
                "email": "a.targaryen@doj.sa",
                "role": "magistrat",
                "discordLinked": true,
                "discordUsername": "aegon",
                "discordHighestRole": "Juge Fédéral",
                "sector": "Section pénale",
                "poles": ["Pôle CI", "Pôle Cour Suprême"],
                "habilitations": "CI, Mandats,  Fédéral",
                "fjf": true
            }"#,
        )
        .unwrap();
        assert!(p.discord_linked);
        assert_eq!(p.discord_highest_role.as_deref(), Some("Juge Fédéral"));
        assert_eq!(p.poles, vec!["Pôle CI", "Pôle Cour Suprême"]);
        assert_eq!(p.habilitations, vec!["CI", "Mandats", "Fédéral"]);
        assert!(p.fjf);
    }

    #[test]
    fn missing_optional_fields_default() {
        let p: Principal = serde_json::from_str(
            r#"{"id": "1", "username": "j.doe", "email": "j.doe@doj.sa"}"#,
        )
        .unwrap();
        assert!(!p.discord_linked);
        assert_eq!(p.discord_highest_role, None);
        assert!(p.poles.is_empty());
        assert!(p.habilitations.is_empty());
        assert!(!p.fjf);
    }

    #[test]
    fn null_collections_become_empty() {
        let p: Principal = serde_json::from_str(
            r#"{"id": "1", "username": "j.doe", "email": "e", "poles": null, "habilitations": null}"#,
        )
        .unwrap();
        assert!(p.poles.is_empty());
        assert!(p.habilitations.is_empty());
    }

    #[test]
    fn display_identity_prefers_discord_names() {
        let mut p = Principal { username: "j.doe".into(), ..Default::default() };
        assert_eq!(p.display_identity(), "j.doe");
        p.discord_username = Some("johnd".into());
        assert_eq!(p.display_identity(), "johnd");
        p.discord_nickname = Some("Juge Doe".into());
        assert_eq!(p.display_identity(), "Juge Doe");
    }

    #[test]
    fn serializes_collections_as_arrays() {
        let p: Principal = serde_json::from_str(
            r#"{"id": "1", "username": "u", "email": "e", "poles": "A, B"}"#,
        )
        .unwrap();
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["poles"], serde_json::json!(["A", "B"]));
        assert!(v.get("discordLinked").is_some());
    }
}
