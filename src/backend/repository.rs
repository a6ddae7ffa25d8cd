use crate::app_config::AppConfig;
use crate::backend::BackendError;
use crate::domain::{Business, Category, TouristSpot};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::future::Future;
use tracing::{debug, info, instrument, warn};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Row-level access to the hosted backend's REST surface.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    url: String,
    business_limit: usize,
}

impl BackendClient {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        BackendClient {
            client,
            url: config.backend().url().trim_end_matches('/').to_string(),
            business_limit: config.backend().business_limit(),
        }
    }

    fn table(&self, name: &str) -> String {
        format!("{}/rest/v1/{}", self.url, name)
    }

    #[instrument(skip(self))]
    pub async fn approved_businesses(&self) -> Result<Vec<Business>, BackendError> {
        info!("Retrieving approved businesses...");
        let request = self.client.get(self.table("empresas_completas")).query(&[
            ("select", "*".to_string()),
            ("status", "eq.aprovado".to_string()),
            ("order", "nome".to_string()),
            ("limit", self.business_limit.to_string()),
        ]);

        let businesses: Vec<Business> = fetch_json(request).await?;
        info!("Retrieving approved businesses... OK, {} found", businesses.len());
        Ok(businesses)
    }

    /// `Ok(None)` when no business carries the slug.
    #[instrument(skip(self))]
    pub async fn business_by_slug(&self, slug: &str) -> Result<Option<Business>, BackendError> {
        self.by_slug("empresas_completas", slug).await
    }

    #[instrument(skip(self))]
    pub async fn businesses_by_ids(&self, ids: &[String]) -> Result<Vec<Business>, BackendError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let request = self.client.get(self.table("empresas_completas")).query(&[
            ("select", "*".to_string()),
            ("id", format!("in.({})", ids.iter().map(|id| quoted(id)).collect::<Vec<_>>().join(","))),
            ("order", "nome".to_string()),
        ]);
        fetch_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn tourist_spots(&self) -> Result<Vec<TouristSpot>, BackendError> {
        info!("Retrieving tourist spots...");
        let request = self
            .client
            .get(self.table("locais_turisticos"))
            .query(&[("select", "*"), ("status", "eq.ativo"), ("order", "nome")]);

        let spots: Vec<TouristSpot> = fetch_json(request).await?;
        info!("Retrieving tourist spots... OK, {} found", spots.len());
        Ok(spots)
    }

    /// `Ok(None)` when no tourist spot carries the slug.
    #[instrument(skip(self))]
    pub async fn tourist_spot_by_slug(&self, slug: &str) -> Result<Option<TouristSpot>, BackendError> {
        self.by_slug("locais_turisticos", slug).await
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        let request = self
            .client
            .get(self.table("categorias"))
            .query(&[("select", "*"), ("order", "ordem")]);
        fetch_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn increment_views(&self, business_id: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.table("rpc/incrementar_visualizacoes"))
            .json(&json!({ "tabela": "empresas", "item_id": business_id }))
            .send()
            .await?;

        ensure_success(response).await?;
        debug!(business_id, "Incremented views");
        Ok(())
    }
}

impl BackendClient {
    async fn by_slug<T: DeserializeOwned>(&self, table: &str, slug: &str) -> Result<Option<T>, BackendError> {
        let response = self
            .client
            .get(self.table(table))
            .header("accept", SINGLE_OBJECT)
            .query(&[("select", "*".to_string()), ("slug", format!("eq.{}", slug))])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_ACCEPTABLE {
            debug!("No row in {} with slug '{}'", table, slug);
            return Ok(None);
        }

        Ok(Some(parse_json(response).await?))
    }
}

/// Runs a list query for a view. Failures are logged and the view gets an empty list instead.
pub async fn load_or_empty<T, F>(what: &str, load: F) -> Vec<T>
where
    F: Future<Output = Result<Vec<T>, BackendError>>,
{
    match load.await {
        Ok(rows) => rows,
        Err(e) => {
            warn!("⚠️ Unable to load {}: {}", what, e);
            Vec::new()
        }
    }
}

/// Quotes a value for a PostgREST `in.(...)` list so that commas and parentheses stay part of it.
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, BackendError> {
    parse_json(request.send().await?).await
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    Ok(ensure_success(response).await?.json::<T>().await?)
}

async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use crate::domain::GeoPoint;
    use crate::domain::Locatable;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    async fn backend() -> (mockito::ServerGuard, BackendClient) {
        let server = mockito::Server::new_async().await;
        let config = AppConfigBuilder::new().backend_url(server.url()).business_limit(2).build();
        let client = BackendClient::new(Client::new(), &config);
        (server, client)
    }

    #[tokio::test]
    async fn approved_businesses_are_mapped() -> Result<(), BackendError> {
        let (mut server, backend) = backend().await;

        let mock = server
            .mock("GET", "/rest/v1/empresas_completas")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*".into()),
                Matcher::UrlEncoded("status".into(), "eq.aprovado".into()),
                Matcher::UrlEncoded("order".into(), "nome".into()),
                Matcher::UrlEncoded("limit".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(include_str!("../../tests/resources/empresas_completas.json"))
            .create_async()
            .await;

        let businesses = backend.approved_businesses().await?;

        mock.assert_async().await;
        assert_eq!(businesses.len(), 2);
        assert_eq!(businesses[0].name, "Farmácia Popular");
        assert_eq!(businesses[0].location(), Some(GeoPoint::new(-20.3211, -48.3129)));
        assert_eq!(businesses[1].location(), None);
        Ok(())
    }

    #[tokio::test]
    async fn a_failing_query_becomes_a_status_error() {
        let (mut server, backend) = backend().await;

        server
            .mock("GET", "/rest/v1/categorias")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let result = backend.categories().await;

        match result {
            Err(BackendError::Status { status, body }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn load_or_empty_degrades_to_an_empty_list() {
        let (mut server, backend) = backend().await;

        server
            .mock("GET", "/rest/v1/empresas_completas")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let businesses = load_or_empty("businesses", backend.approved_businesses()).await;

        assert!(businesses.is_empty());
    }

    #[tokio::test]
    async fn categories_are_ordered_by_the_backend() -> Result<(), BackendError> {
        let (mut server, backend) = backend().await;

        let mock = server
            .mock("GET", "/rest/v1/categorias")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*".into()),
                Matcher::UrlEncoded("order".into(), "ordem".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r##"[{"id":"c1","nome":"Alimentação","icone":"utensils","cor":"#16a34a","ordem":1}]"##)
            .create_async()
            .await;

        let categories = backend.categories().await?;

        mock.assert_async().await;
        assert_eq!(
            categories,
            vec![Category {
                id: "c1".to_string(),
                name: "Alimentação".to_string(),
                icon: Some("utensils".to_string()),
                color: Some("#16a34a".to_string()),
                order: 1,
            }]
        );
        Ok(())
    }

    #[tokio::test]
    async fn unknown_slug_is_none() -> Result<(), BackendError> {
        let (mut server, backend) = backend().await;

        server
            .mock("GET", "/rest/v1/empresas_completas")
            .match_query(Matcher::UrlEncoded("slug".into(), "eq.nao-existe".into()))
            .match_header("accept", SINGLE_OBJECT)
            .with_status(406)
            .create_async()
            .await;

        assert_eq!(backend.business_by_slug("nao-existe").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn businesses_by_ids_uses_an_in_filter() -> Result<(), BackendError> {
        let (mut server, backend) = backend().await;

        let mock = server
            .mock("GET", "/rest/v1/empresas_completas")
            .match_query(Matcher::UrlEncoded("id".into(), r#"in.("a","b")"#.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let businesses = backend.businesses_by_ids(&["a".to_string(), "b".to_string()]).await?;

        mock.assert_async().await;
        assert!(businesses.is_empty());
        Ok(())
    }

    #[test]
    fn ids_with_separators_are_quoted() {
        assert_eq!(quoted("a,b)"), r#""a,b)""#);
        assert_eq!(quoted(r#"say "hi""#), r#""say \"hi\"""#);
    }

    #[tokio::test]
    async fn tourist_spots_are_mapped() -> Result<(), BackendError> {
        let (mut server, backend) = backend().await;

        let mock = server
            .mock("GET", "/rest/v1/locais_turisticos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*".into()),
                Matcher::UrlEncoded("status".into(), "eq.ativo".into()),
                Matcher::UrlEncoded("order".into(), "nome".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(include_str!("../../tests/resources/locais_turisticos.json"))
            .create_async()
            .await;

        let spots = backend.tourist_spots().await?;

        mock.assert_async().await;
        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].name, "Igreja Matriz");
        assert_eq!(spots[0].location(), Some(GeoPoint::new(-20.3190, -48.3112)));
        assert!(spots[1].free_entry);
        Ok(())
    }

    #[tokio::test]
    async fn tourist_spot_by_slug_asks_for_a_single_object() -> Result<(), BackendError> {
        let (mut server, backend) = backend().await;

        let mock = server
            .mock("GET", "/rest/v1/locais_turisticos")
            .match_query(Matcher::UrlEncoded("slug".into(), "eq.lago-maraca".into()))
            .match_header("accept", SINGLE_OBJECT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"t2","nome":"Lago Maracá","slug":"lago-maraca","latitude":-20.3150,"longitude":-48.3080}"#)
            .create_async()
            .await;

        let spot = backend.tourist_spot_by_slug("lago-maraca").await?;

        mock.assert_async().await;
        assert_eq!(spot.map(|s| s.name), Some("Lago Maracá".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_tourist_spot_slug_is_none() -> Result<(), BackendError> {
        let (mut server, backend) = backend().await;

        server
            .mock("GET", "/rest/v1/locais_turisticos")
            .match_query(Matcher::Any)
            .with_status(406)
            .create_async()
            .await;

        assert_eq!(backend.tourist_spot_by_slug("nao-existe").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn no_ids_means_no_request() -> Result<(), BackendError> {
        let (mut server, backend) = backend().await;
        let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        assert!(backend.businesses_by_ids(&[]).await?.is_empty());
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn increment_views_calls_the_remote_procedure() -> Result<(), BackendError> {
        let (mut server, backend) = backend().await;

        let mock = server
            .mock("POST", "/rest/v1/rpc/incrementar_visualizacoes")
            .match_body(Matcher::Json(json!({ "tabela": "empresas", "item_id": "b1" })))
            .with_status(204)
            .create_async()
            .await;

        backend.increment_views("b1").await?;

        mock.assert_async().await;
        Ok(())
    }
}
