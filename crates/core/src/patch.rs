use serde::{Deserialize, Deserializer};

/// One field of a partial update.
///
/// `Absent` means the key was not in the payload. `Present` means it was,
/// whatever its value. A submitted `null` on an `Option` field becomes
/// `Present(None)`. Fields must carry `#[serde(default)]` so missing keys
/// deserialize to `Absent`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Key was not submitted.
    #[default]
    Absent,
    /// Key was submitted with this value.
    Present(T),
}

impl<T> Patch<T> {
    /// Returns whether the key was submitted.
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns the submitted value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Absent => None,
            Self::Present(value) => Some(value),
        }
    }

    /// Overwrites `target` when the key was submitted.
    pub fn apply_to(self, target: &mut T) {
        if let Self::Present(value) = self {
            *target = value;
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::Present)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::Patch;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default)]
        title: Patch<String>,
        #[serde(default)]
        end_date: Patch<Option<String>>,
    }

    #[test]
    fn missing_key_is_absent() {
        let payload: Payload =
            serde_json::from_str("{}").unwrap_or_else(|error| panic!("decode failed: {error}"));
        assert_eq!(payload.title, Patch::Absent);
        assert_eq!(payload.end_date, Patch::Absent);
    }

    #[test]
    fn explicit_null_is_present() {
        let payload: Payload = serde_json::from_str(r#"{"end_date": null, "title": "x"}"#)
            .unwrap_or_else(|error| panic!("decode failed: {error}"));
        assert_eq!(payload.title, Patch::Present("x".to_owned()));
        assert_eq!(payload.end_date, Patch::Present(None));
    }

    #[test]
    fn apply_to_only_overwrites_present_values() {
        let mut target = "before".to_owned();
        Patch::Absent.apply_to(&mut target);
        assert_eq!(target, "before");

        Patch::Present("after".to_owned()).apply_to(&mut target);
        assert_eq!(target, "after");
    }
}
