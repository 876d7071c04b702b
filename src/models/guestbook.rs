use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One guestbook submission as stored in local storage.
/// The whole list is serialized as a single JSON array, newest first.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GuestbookEntry {
    pub id: String,
    pub name: String,
    pub message: String,
    pub date: String,
}

/// Raw input as read from the name and message fields.
#[derive(Debug)]
pub struct GuestbookForm {
    pub name: String,
    pub message: String,
}

impl GuestbookForm {
    pub fn new(name: &str, message: &str) -> Self {
        GuestbookForm {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}

impl GuestbookEntry {
    /// Build an entry from a submitted form. Fails when the message is blank
    /// after trimming; a blank name falls back to `anonymous`.
    pub fn from_form(form: &GuestbookForm, anonymous: &str, now: DateTime<Utc>) -> Result<Self, String> {
        let message = form.message.trim();
        if message.is_empty() {
            return Err("Please enter a message!".to_string());
        }

        let name = match form.name.trim() {
            "" => anonymous.to_string(),
            n => n.to_string(),
        };

        Ok(GuestbookEntry {
            // Millisecond ids can collide on rapid submissions; nothing relies on uniqueness
            id: now.timestamp_millis().to_string(),
            name,
            message: message.to_string(),
            date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// Parse the stored list. Anything other than an array of complete
    /// entries is an error; callers decide how to recover.
    pub fn list_from_json(raw: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn list_to_json(entries: &[Self]) -> Result<String, String> {
        serde_json::to_string(entries).map_err(|e| e.to_string())
    }

    /// Creation time, if the stored date is a valid ISO-8601 timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_blank_name_becomes_anonymous() {
        let form = GuestbookForm::new("   ", "Hello");
        let entry = GuestbookEntry::from_form(&form, "Anonymous", fixed_now()).unwrap();
        assert_eq!(entry.name, "Anonymous");
        assert_eq!(entry.message, "Hello");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let form = GuestbookForm::new("  Ann ", "\n hi there \t");
        let entry = GuestbookEntry::from_form(&form, "Anonymous", fixed_now()).unwrap();
        assert_eq!(entry.name, "Ann");
        assert_eq!(entry.message, "hi there");
    }

    #[test]
    fn test_blank_message_rejected() {
        let form = GuestbookForm::new("Ann", "  \n ");
        assert!(GuestbookEntry::from_form(&form, "Anonymous", fixed_now()).is_err());
    }

    #[test]
    fn test_id_and_date_from_clock() {
        let form = GuestbookForm::new("Ann", "hi");
        let entry = GuestbookEntry::from_form(&form, "Anonymous", fixed_now()).unwrap();
        assert_eq!(entry.id, fixed_now().timestamp_millis().to_string());
        assert_eq!(entry.date, "2026-10-19T08:30:00.000Z");
        assert_eq!(entry.created_at(), Some(fixed_now()));
    }

    #[test]
    fn test_non_list_json_is_error() {
        assert!(GuestbookEntry::list_from_json("{\"name\":\"x\"}").is_err());
        assert!(GuestbookEntry::list_from_json("42").is_err());
        assert!(GuestbookEntry::list_from_json("not json").is_err());
        assert!(GuestbookEntry::list_from_json("[{\"name\":\"only a name\"}]").is_err());
    }

    #[test]
    fn test_stored_shape_uses_plain_field_names() {
        let form = GuestbookForm::new("Ann", "hi");
        let entry = GuestbookEntry::from_form(&form, "Anonymous", fixed_now()).unwrap();
        let json = GuestbookEntry::list_to_json(&[entry]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = &value[0];
        assert_eq!(obj["name"], "Ann");
        assert_eq!(obj["message"], "hi");
        assert!(obj["id"].is_string());
        assert!(obj["date"].is_string());
    }
}
