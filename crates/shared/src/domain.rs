use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(UserId);

impl Default for UserId {
    fn default() -> Self {
        Self(2)
    }
}

/// A decoded user as served by the users endpoint.
///
/// The wire name of the avatar field is `avatar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
}

/// `{ "data": { ... } }` wrapper around a single user. Unknown members such
/// as `support` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub data: UserRecord,
}

impl UserEnvelope {
    pub fn into_record(self) -> UserRecord {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_envelope_and_ignores_extra_members() {
        let raw = r#"{
            "data": {
                "id": 2,
                "email": "janet.weaver@reqres.in",
                "first_name": "Janet",
                "avatar": "https://reqres.in/img/faces/2-image.jpg"
            },
            "support": { "url": "https://reqres.in/#support-heading" }
        }"#;

        let record = serde_json::from_str::<UserEnvelope>(raw)
            .expect("decode envelope")
            .into_record();
        assert_eq!(record.id, UserId(2));
        assert_eq!(record.email, "janet.weaver@reqres.in");
        assert_eq!(record.avatar_url, "https://reqres.in/img/faces/2-image.jpg");
    }

    #[test]
    fn missing_avatar_is_a_decode_error() {
        let raw = r#"{"data": {"id": 2, "email": "janet.weaver@reqres.in"}}"#;
        let err = serde_json::from_str::<UserEnvelope>(raw).expect_err("must fail");
        assert!(err.to_string().contains("avatar"), "unexpected error: {err}");
    }

    #[test]
    fn bare_record_without_envelope_is_rejected() {
        let raw = r#"{"id": 2, "email": "a@b.c", "avatar": "https://x/y.png"}"#;
        assert!(serde_json::from_str::<UserEnvelope>(raw).is_err());
    }
}
