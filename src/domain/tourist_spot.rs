use crate::domain::business::null_as_empty;
use crate::domain::{GeoPoint, Locatable};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum TouristSpotStatus {
    #[default]
    #[serde(rename = "ativo")]
    Active,
    #[serde(rename = "inativo")]
    Inactive,
    #[serde(rename = "manutencao")]
    UnderMaintenance,
}

/// A sight or leisure spot from the `locais_turisticos` table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TouristSpot {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "endereco", default)]
    pub address: Option<String>,
    #[serde(rename = "bairro", default)]
    pub neighborhood: Option<String>,
    #[serde(rename = "imagens", default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    #[serde(rename = "horario_funcionamento", default)]
    pub opening_hours: Option<String>,
    #[serde(rename = "entrada_gratuita", default)]
    pub free_entry: bool,
    #[serde(rename = "valor_entrada", default)]
    pub entry_fee: Option<f64>,
    #[serde(rename = "acessibilidade", default)]
    pub accessible: bool,
    #[serde(rename = "estacionamento", default)]
    pub parking: bool,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "site", default)]
    pub website: Option<String>,
    #[serde(default)]
    pub status: TouristSpotStatus,
    #[serde(rename = "destaque", default)]
    pub featured: bool,
    #[serde(rename = "visualizacoes", default)]
    pub views: u64,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Locatable for TouristSpot {
    fn location(&self) -> Option<GeoPoint> {
        self.latitude.zip(self.longitude).map(|(lat, lng)| GeoPoint::new(lat, lng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn maps_a_row_with_missing_optional_columns() -> Result<(), serde_json::Error> {
        let spot: TouristSpot = serde_json::from_value(json!({
            "id": "t1",
            "nome": "Lago Maracá",
            "imagens": null,
            "status": "manutencao",
            "latitude": -20.3150,
            "longitude": -48.3080
        }))?;

        assert_eq!(spot.name, "Lago Maracá");
        assert!(spot.images.is_empty());
        assert_eq!(spot.status, TouristSpotStatus::UnderMaintenance);
        assert_eq!(spot.location(), Some(GeoPoint::new(-20.3150, -48.3080)));
        Ok(())
    }

    #[test]
    fn a_single_coordinate_is_no_location() -> Result<(), serde_json::Error> {
        let spot: TouristSpot = serde_json::from_value(json!({ "id": "t2", "nome": "Mirante", "latitude": -20.31 }))?;

        assert_eq!(spot.location(), None);
        Ok(())
    }
}
