use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "icone", default)]
    pub icon: Option<String>,
    #[serde(rename = "cor", default)]
    pub color: Option<String>,
    #[serde(rename = "ordem", default)]
    pub order: i32,
}
