/// Service configuration loaded from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-cased
/// variable names (`database_url` <- `DATABASE_URL`). Optional settings carry
/// `#[serde(default = "...")]`.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
