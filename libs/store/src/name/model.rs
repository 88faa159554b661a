use serde::Serialize;
use sqlx::FromRow;

/// A registered name, keyed by its full `sld.tld` form.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Name {
    pub id: String,
    pub sld: String,
    pub tld: String,
}

impl Name {
    /// Splits on dots; anything past the second label is ignored.
    pub fn parse(id: &str) -> Self {
        let mut labels = id.split('.');
        let sld = labels.next().unwrap_or_default().to_string();
        let tld = labels.next().unwrap_or_default().to_string();
        Name { id: id.to_string(), sld, tld }
    }
}
