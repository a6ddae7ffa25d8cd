use crate::domain::{GeoPoint, Locatable};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum BusinessStatus {
    #[default]
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "aprovado")]
    Approved,
    #[serde(rename = "rejeitado")]
    Rejected,
    #[serde(rename = "inativo")]
    Inactive,
}

/// A directory entry as exposed by the `empresas_completas` view.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Business {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categoria_id: Option<String>,
    #[serde(rename = "categoria_nome", default)]
    pub category_name: Option<String>,
    #[serde(rename = "subcategorias", default, deserialize_with = "null_as_empty")]
    pub subcategories: Vec<String>,
    #[serde(rename = "bairro", default)]
    pub neighborhood: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub status: BusinessStatus,
    #[serde(rename = "destaque", default)]
    pub featured: bool,
    #[serde(rename = "verificado", default)]
    pub verified: bool,
    #[serde(rename = "visualizacoes", default)]
    pub views: u64,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Locatable for Business {
    fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }
}

pub(super) fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
impl Business {
    pub fn named(id: &str, name: &str) -> Self {
        Business {
            id: id.to_string(),
            name: name.to_string(),
            slug: None,
            description: None,
            categoria_id: None,
            category_name: None,
            subcategories: Vec::new(),
            neighborhood: None,
            address: None,
            phone: None,
            whatsapp: None,
            logo: None,
            status: BusinessStatus::Approved,
            featured: false,
            verified: false,
            views: 0,
            latitude: None,
            longitude: None,
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.latitude = Some(lat);
        self.longitude = Some(lng);
        self
    }

    pub fn in_category(mut self, category: &str) -> Self {
        self.category_name = Some(category.to_string());
        self
    }

    pub fn in_neighborhood(mut self, neighborhood: &str) -> Self {
        self.neighborhood = Some(neighborhood.to_string());
        self
    }
}
