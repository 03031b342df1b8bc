//! User records as delivered by the two public demo APIs.
//!
//! JSONPlaceholder users arrive as a flat profile with one address and one
//! employer; RandomUser results carry nested name, location, login and
//! demographic sub-objects. Every field deserializes with a default so a
//! partially populated payload still renders (blank cells rather than errors).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ProfilePdfError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    JsonPlaceholder,
    RandomUser,
}

impl DataSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::JsonPlaceholder => "jsonplaceholder",
            DataSource::RandomUser => "randomuser",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "jsonplaceholder" | "flat" | "simple" => Ok(DataSource::JsonPlaceholder),
            "randomuser" | "rich" => Ok(DataSource::RandomUser),
            other => Err(format!("unknown data source: {other}")),
        }
    }
}

/// JSON `null` decodes to the field's default, as an absent key does.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geo {
    #[serde(deserialize_with = "null_as_default")]
    pub lat: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lng: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatAddress {
    #[serde(deserialize_with = "null_as_default")]
    pub street: String,
    #[serde(deserialize_with = "null_as_default")]
    pub suite: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub zipcode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub geo: Geo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Company {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub catch_phrase: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bs: String,
}

/// JSONPlaceholder `/users` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: FlatAddress,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: Company,
}

impl FlatProfile {
    pub fn full_address(&self) -> String {
        let a = &self.address;
        format!("{}, {}, {}, {}", a.street, a.suite, a.city, a.zipcode)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonName {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub first: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Street {
    #[serde(deserialize_with = "null_as_default")]
    pub number: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// RandomUser postcodes are strings in some locales and numbers in others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Postcode {
    Number(i64),
    Text(String),
}

impl Default for Postcode {
    fn default() -> Self {
        Postcode::Text(String::new())
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Postcode::Number(n) => write!(f, "{n}"),
            Postcode::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: String,
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timezone {
    #[serde(deserialize_with = "null_as_default")]
    pub offset: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(deserialize_with = "null_as_default")]
    pub street: Street,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postcode: Postcode,
    #[serde(deserialize_with = "null_as_default")]
    pub coordinates: Coordinates,
    #[serde(deserialize_with = "null_as_default")]
    pub timezone: Timezone,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Login {
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub password: String,
    #[serde(deserialize_with = "null_as_default")]
    pub salt: String,
    #[serde(deserialize_with = "null_as_default")]
    pub md5: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sha1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sha256: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatedAge {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub age: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identifier {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Picture {
    #[serde(deserialize_with = "null_as_default")]
    pub large: String,
    #[serde(deserialize_with = "null_as_default")]
    pub medium: String,
    #[serde(deserialize_with = "null_as_default")]
    pub thumbnail: String,
}

/// RandomUser `results[]` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: PersonName,
    #[serde(deserialize_with = "null_as_default")]
    pub location: Location,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub login: Login,
    #[serde(deserialize_with = "null_as_default")]
    pub dob: DatedAge,
    #[serde(deserialize_with = "null_as_default")]
    pub registered: DatedAge,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cell: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: Identifier,
    #[serde(deserialize_with = "null_as_default")]
    pub picture: Picture,
    #[serde(deserialize_with = "null_as_default")]
    pub nat: String,
}

impl RichProfile {
    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.name.title, self.name.first, self.name.last)
    }

    pub fn street_line(&self) -> String {
        let street = &self.location.street;
        format!("{} {}", street.number, street.name)
    }

    pub fn full_address(&self) -> String {
        let l = &self.location;
        format!(
            "{}, {}, {}, {}, {}",
            self.street_line(),
            l.city,
            l.state,
            l.country,
            l.postcode
        )
    }

    pub fn birth_date(&self) -> String {
        display_date(&self.dob.date)
    }

    pub fn registered_date(&self) -> String {
        display_date(&self.registered.date)
    }
}

/// A fetched user, tagged by the API it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "user", rename_all = "lowercase")]
pub enum UserRecord {
    #[serde(rename = "jsonplaceholder")]
    Flat(FlatProfile),
    #[serde(rename = "randomuser")]
    Rich(RichProfile),
}

impl UserRecord {
    pub fn source(&self) -> DataSource {
        match self {
            UserRecord::Flat(_) => DataSource::JsonPlaceholder,
            UserRecord::Rich(_) => DataSource::RandomUser,
        }
    }

    /// Decodes a raw API payload. JSONPlaceholder may be the `/users` array
    /// (first entry wins) or a single user; RandomUser may be the response
    /// envelope (`results[0]`) or a single result.
    pub fn from_api_json(source: DataSource, json: &str) -> Result<Self, ProfilePdfError> {
        let value: Value = serde_json::from_str(json)?;
        match source {
            DataSource::JsonPlaceholder => {
                let user = first_entry(value)?;
                Ok(UserRecord::Flat(serde_json::from_value(user)?))
            }
            DataSource::RandomUser => {
                let user = match value {
                    Value::Object(mut map) if map.contains_key("results") => {
                        first_entry(map.remove("results").unwrap_or(Value::Null))?
                    }
                    other => first_entry(other)?,
                };
                Ok(UserRecord::Rich(serde_json::from_value(user)?))
            }
        }
    }

    /// Applies a typed partial edit. The update must target the loaded variant.
    pub fn apply_update(&mut self, update: RecordUpdate) -> Result<(), ProfilePdfError> {
        match (self, update) {
            (UserRecord::Flat(profile), RecordUpdate::Flat(update)) => {
                update.apply(profile);
                Ok(())
            }
            (UserRecord::Rich(profile), RecordUpdate::Rich(update)) => {
                update.apply(profile);
                Ok(())
            }
            (record, update) => Err(ProfilePdfError::MismatchedUpdate {
                update: update.source(),
                record: record.source(),
            }),
        }
    }
}

fn first_entry(value: Value) -> Result<Value, ProfilePdfError> {
    match value {
        Value::Array(items) => items.into_iter().next().ok_or(ProfilePdfError::MissingRecord),
        Value::Null => Err(ProfilePdfError::MissingRecord),
        Value::Object(map) if map.is_empty() => Err(ProfilePdfError::MissingRecord),
        other => Ok(other),
    }
}

/// `M/D/YYYY`, the short date form used on documents.
pub fn short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

// API timestamps are RFC 3339; anything unparseable is shown verbatim.
fn display_date(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return short_date(parsed.date_naive());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return short_date(parsed);
    }
    raw.to_string()
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Edits to a [`FlatProfile`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatProfileUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub street: Option<String>,
    pub suite: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub company_name: Option<String>,
    pub catch_phrase: Option<String>,
    pub bs: Option<String>,
}

impl FlatProfileUpdate {
    pub fn apply(self, profile: &mut FlatProfile) {
        set(&mut profile.name, self.name);
        set(&mut profile.username, self.username);
        set(&mut profile.email, self.email);
        set(&mut profile.phone, self.phone);
        set(&mut profile.website, self.website);
        set(&mut profile.address.street, self.street);
        set(&mut profile.address.suite, self.suite);
        set(&mut profile.address.city, self.city);
        set(&mut profile.address.zipcode, self.zipcode);
        set(&mut profile.company.name, self.company_name);
        set(&mut profile.company.catch_phrase, self.catch_phrase);
        set(&mut profile.company.bs, self.bs);
    }
}

/// Edits to a [`RichProfile`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichProfileUpdate {
    pub title: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cell: Option<String>,
    pub street_number: Option<u32>,
    pub street_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postcode: Option<Postcode>,
    pub dob_date: Option<String>,
    pub dob_age: Option<u32>,
    pub username: Option<String>,
    pub nat: Option<String>,
}

impl RichProfileUpdate {
    pub fn apply(self, profile: &mut RichProfile) {
        set(&mut profile.name.title, self.title);
        set(&mut profile.name.first, self.first);
        set(&mut profile.name.last, self.last);
        set(&mut profile.gender, self.gender);
        set(&mut profile.email, self.email);
        set(&mut profile.phone, self.phone);
        set(&mut profile.cell, self.cell);
        set(&mut profile.location.street.number, self.street_number);
        set(&mut profile.location.street.name, self.street_name);
        set(&mut profile.location.city, self.city);
        set(&mut profile.location.state, self.state);
        set(&mut profile.location.country, self.country);
        set(&mut profile.location.postcode, self.postcode);
        set(&mut profile.dob.date, self.dob_date);
        set(&mut profile.dob.age, self.dob_age);
        set(&mut profile.login.username, self.username);
        set(&mut profile.nat, self.nat);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "changes", rename_all = "lowercase")]
pub enum RecordUpdate {
    #[serde(rename = "jsonplaceholder")]
    Flat(FlatProfileUpdate),
    #[serde(rename = "randomuser")]
    Rich(RichProfileUpdate),
}

impl RecordUpdate {
    pub fn source(&self) -> DataSource {
        match self {
            RecordUpdate::Flat(_) => DataSource::JsonPlaceholder,
            RecordUpdate::Rich(_) => DataSource::RandomUser,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSONPLACEHOLDER_USERS: &str = r#"[
      {
        "id": 1,
        "name": "Leanne Graham",
        "username": "Bret",
        "email": "Sincere@april.biz",
        "address": {
          "street": "Kulas Light",
          "suite": "Apt. 556",
          "city": "Gwenborough",
          "zipcode": "92998-3874",
          "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
          "name": "Romaguera-Crona",
          "catchPhrase": "Multi-layered client-server neural-net",
          "bs": "harness real-time e-markets"
        }
      },
      { "id": 2, "name": "Ervin Howell" }
    ]"#;

    const RANDOMUSER_RESPONSE: &str = r#"{
      "results": [{
        "gender": "female",
        "name": { "title": "Ms", "first": "Aino", "last": "Lampi" },
        "location": {
          "street": { "number": 4467, "name": "Pispalan Valtatie" },
          "city": "Pori", "state": "Satakunta", "country": "Finland",
          "postcode": 73441,
          "coordinates": { "latitude": "-1.6217", "longitude": "86.4573" },
          "timezone": { "offset": "+2:00", "description": "Kaliningrad, South Africa" }
        },
        "email": "aino.lampi@example.com",
        "login": { "uuid": "8d1f", "username": "bigbird512" },
        "dob": { "date": "1985-03-21T06:47:30.921Z", "age": 40 },
        "registered": { "date": "2012-07-04T10:15:00.000Z", "age": 13 },
        "phone": "03-214-580", "cell": "043-117-02-08",
        "id": { "name": "HETU", "value": null },
        "picture": { "large": "https://randomuser.me/api/portraits/women/1.jpg" },
        "nat": "FI"
      }],
      "info": { "seed": "abc", "results": 1, "page": 1, "version": "1.4" }
    }"#;

    #[test]
    fn null_fields_decode_as_blank() {
        let json = r#"{"name": "Leanne Graham", "id": null, "website": null,
            "address": {"city": null, "geo": null}, "company": null}"#;
        let UserRecord::Flat(profile) =
            UserRecord::from_api_json(DataSource::JsonPlaceholder, json).unwrap()
        else {
            panic!("expected a flat profile");
        };
        assert_eq!(profile.name, "Leanne Graham");
        assert_eq!(profile.id, 0);
        assert_eq!(profile.website, "");
        assert_eq!(profile.address, FlatAddress::default());
        assert_eq!(profile.company, Company::default());

        let json = r#"{"results": [{
            "name": {"title": null, "first": "Aino", "last": "Lampi"},
            "location": {"street": {"number": null, "name": null}, "postcode": null},
            "dob": {"date": null, "age": null},
            "phone": null
        }]}"#;
        let UserRecord::Rich(profile) =
            UserRecord::from_api_json(DataSource::RandomUser, json).unwrap()
        else {
            panic!("expected a rich profile");
        };
        assert_eq!(profile.name.title, "");
        assert_eq!(profile.location.street, Street::default());
        assert_eq!(profile.location.postcode, Postcode::Text(String::new()));
        assert_eq!(profile.dob, DatedAge::default());
        assert_eq!(profile.phone, "");
        assert_eq!(profile.full_name(), " Aino Lampi");
    }

    #[test]
    fn jsonplaceholder_array_takes_the_first_user() {
        let record =
            UserRecord::from_api_json(DataSource::JsonPlaceholder, JSONPLACEHOLDER_USERS).unwrap();
        let UserRecord::Flat(profile) = record else {
            panic!("expected a flat profile");
        };
        assert_eq!(profile.name, "Leanne Graham");
        assert_eq!(profile.company.catch_phrase, "Multi-layered client-server neural-net");
        assert_eq!(
            profile.full_address(),
            "Kulas Light, Apt. 556, Gwenborough, 92998-3874"
        );
    }

    #[test]
    fn randomuser_envelope_takes_the_first_result() {
        let record = UserRecord::from_api_json(DataSource::RandomUser, RANDOMUSER_RESPONSE).unwrap();
        let UserRecord::Rich(profile) = record else {
            panic!("expected a rich profile");
        };
        assert_eq!(profile.full_name(), "Ms Aino Lampi");
        assert_eq!(profile.location.postcode, Postcode::Number(73441));
        assert_eq!(
            profile.full_address(),
            "4467 Pispalan Valtatie, Pori, Satakunta, Finland, 73441"
        );
        assert_eq!(profile.birth_date(), "3/21/1985");
        assert_eq!(profile.id.value, None);
    }

    #[test]
    fn string_postcodes_are_kept_verbatim() {
        let json = r#"{"location": {"postcode": "EC1A 1BB"}}"#;
        let record = UserRecord::from_api_json(DataSource::RandomUser, json).unwrap();
        let UserRecord::Rich(profile) = record else {
            panic!("expected a rich profile");
        };
        assert_eq!(profile.location.postcode.to_string(), "EC1A 1BB");
    }

    #[test]
    fn empty_payloads_are_missing_records() {
        for (source, json) in [
            (DataSource::JsonPlaceholder, "[]"),
            (DataSource::RandomUser, r#"{"results": []}"#),
            (DataSource::RandomUser, "null"),
        ] {
            let err = UserRecord::from_api_json(source, json).unwrap_err();
            assert!(matches!(err, ProfilePdfError::MissingRecord), "{source}: {err}");
        }
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = UserRecord::from_api_json(DataSource::JsonPlaceholder, "{not json").unwrap_err();
        assert!(matches!(err, ProfilePdfError::Json(_)));
    }

    #[test]
    fn unparseable_dates_render_verbatim() {
        assert_eq!(display_date("sometime in spring"), "sometime in spring");
        assert_eq!(display_date("1999-12-31"), "12/31/1999");
        assert_eq!(display_date(""), "");
    }

    #[test]
    fn typed_updates_touch_only_named_fields() {
        let mut record =
            UserRecord::from_api_json(DataSource::JsonPlaceholder, JSONPLACEHOLDER_USERS).unwrap();
        let update = RecordUpdate::Flat(FlatProfileUpdate {
            city: Some("Lisbon".to_string()),
            catch_phrase: Some("Edited".to_string()),
            ..FlatProfileUpdate::default()
        });
        record.apply_update(update).unwrap();
        let UserRecord::Flat(profile) = record else {
            panic!("expected a flat profile");
        };
        assert_eq!(profile.address.city, "Lisbon");
        assert_eq!(profile.company.catch_phrase, "Edited");
        assert_eq!(profile.name, "Leanne Graham");
    }

    #[test]
    fn updates_for_the_other_source_are_rejected() {
        let mut record = UserRecord::Flat(FlatProfile::default());
        let err = record
            .apply_update(RecordUpdate::Rich(RichProfileUpdate::default()))
            .unwrap_err();
        assert!(matches!(
            err,
            ProfilePdfError::MismatchedUpdate {
                update: DataSource::RandomUser,
                record: DataSource::JsonPlaceholder,
            }
        ));
    }

    #[test]
    fn updates_deserialize_from_tagged_json() {
        let json = r#"{"source": "randomuser", "changes": {"first": "Ada", "street_number": 12}}"#;
        let update: RecordUpdate = serde_json::from_str(json).unwrap();
        let RecordUpdate::Rich(changes) = update else {
            panic!("expected a rich update");
        };
        assert_eq!(changes.first.as_deref(), Some("Ada"));
        assert_eq!(changes.street_number, Some(12));
    }
}
