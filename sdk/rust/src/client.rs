//! Sphere GraphQL client.
//!
//! [`SphereClient`] sends queries through a [`Transport`], recovers from
//! HTTP failures through registered [`HttpExceptionHandler`]s and unwraps
//! the `selectAll` / `selectOne` envelopes into typed entities.
//!
//! ```ignore
//! use sphere_sdk::{selector, RetryOnStatus, SphereClient};
//!
//! let client = SphereClient::new("https://sphere.example.com/graphql")?
//!     .with_exception_handler(RetryOnStatus::new([503]));
//!
//! let partner = client
//!     .find_partner_by_id(1, selector! { id, name }, None)
//!     .await?;
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;
use sphere_query::{Arguments, Operation, PaginationOptions, SelectQuery, Selector};
use sphere_schema::{
    ArrowCompanyType, EndCustomerType, Entity, PartnerType, SelectAllQueryType,
    SelectAllResultType, SelectOneQueryType, SelectOneResultType,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{SdkError, SdkResult};
use crate::exception::{Hooks, HttpExceptionHandler};
use crate::response::{unwrap_entity, unwrap_page, EntityPage};
use crate::transport::{GraphqlPayload, Headers, HttpTransport, Transport, TransportRequest};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "apiKey";

/// Environment variable holding the endpoint URL.
pub const ENV_URL: &str = "SPHERE_GRAPHQL_URL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "SPHERE_API_KEY";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "SPHERE_TIMEOUT_SECS";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL of the GraphQL endpoint.
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Headers sent with every request.
    pub headers: Headers,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout: Duration::from_secs(30),
            headers: Headers::new(),
        }
    }
}

impl ClientConfig {
    /// Creates a new config with a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Reads the config from `SPHERE_GRAPHQL_URL`, `SPHERE_API_KEY` and
    /// `SPHERE_TIMEOUT_SECS`.
    pub fn from_env() -> SdkResult<Self> {
        let url = std::env::var(ENV_URL)
            .map_err(|_| SdkError::Config(format!("{ENV_URL} is not set")))?;
        let mut config = Self::new(url);

        if let Ok(key) = std::env::var(ENV_API_KEY) {
            config = config.api_key(key);
        }
        if let Ok(secs) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.parse().map_err(|_| {
                SdkError::Config(format!("{ENV_TIMEOUT_SECS} must be a number of seconds"))
            })?;
            config = config.timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a default header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the `apiKey` header.
    pub fn api_key(self, key: impl Into<String>) -> Self {
        self.header(API_KEY_HEADER, key)
    }
}

/// The Sphere client.
#[derive(Clone)]
pub struct SphereClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    handlers: Vec<Arc<dyn HttpExceptionHandler>>,
}

impl std::fmt::Debug for SphereClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SphereClient")
            .field("config", &self.config)
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

impl SphereClient {
    /// Creates an HTTP client for the given URL.
    pub fn new(url: impl Into<String>) -> SdkResult<Self> {
        Self::with_config(ClientConfig::new(url))
    }

    /// Creates an HTTP client from a configuration.
    pub fn with_config(config: ClientConfig) -> SdkResult<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a client sending through `transport`.
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
            handlers: Vec::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.config.url = url.into();
    }

    /// Replaces every configured header.
    pub fn set_headers(&mut self, headers: Headers) {
        self.config.headers = headers;
    }

    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.config.headers.insert(key.into(), value.into());
    }

    /// Appends an exception handler. Earlier registrations take precedence.
    pub fn register_http_exception_handler(
        &mut self,
        handler: impl HttpExceptionHandler + 'static,
    ) {
        self.handlers.push(Arc::new(handler));
    }

    /// Builder form of [`register_http_exception_handler`](Self::register_http_exception_handler).
    pub fn with_exception_handler(mut self, handler: impl HttpExceptionHandler + 'static) -> Self {
        self.register_http_exception_handler(handler);
        self
    }

    fn handler_for(&self, status: u16) -> Option<&Arc<dyn HttpExceptionHandler>> {
        self.handlers.iter().find(|handler| handler.handles(status))
    }

    /// Sends a query, retrying at most once when a handler asks for it.
    ///
    /// Returns the response `data`, or `None` for a nullish response.
    pub async fn dispatch(&self, query: &str) -> SdkResult<Option<Value>> {
        let request = TransportRequest {
            url: self.config.url.clone(),
            query: query.to_string(),
            headers: self.config.headers.clone(),
        };
        debug!(url = %request.url, query = %request.query, "dispatching query");

        let error = match self.transport.send(&request).await {
            Ok(payload) => return accept(payload),
            Err(error) => error,
        };

        let Some(status) = error.status else {
            warn!(error = %error, "transport failed without an HTTP status");
            return Err(SdkError::UnhandledTransport(error));
        };
        let Some(handler) = self.handler_for(status) else {
            warn!(status, error = %error, "no exception handler for status");
            return Err(SdkError::UnhandledTransport(error));
        };

        let outcome = handler
            .handle(error, Hooks::new(request.headers.clone()))
            .await;
        if !outcome.must_retry {
            warn!(status, error = %outcome.error, "exception handler declined retry");
            return Err(SdkError::UnhandledTransport(outcome.error));
        }

        info!(status, "retrying query");
        let retry = TransportRequest {
            headers: outcome.hooks.headers,
            ..request
        };
        match self.transport.send(&retry).await {
            Ok(payload) => accept(payload),
            Err(error) => {
                warn!(status = ?error.status, error = %error, "retry failed");
                Err(SdkError::UnhandledTransport(error))
            }
        }
    }

    /// Sends a pre-built query and decodes its data.
    ///
    /// Transport failures surface as [`SdkError::UnhandledTransport`].
    pub async fn try_find<T: DeserializeOwned>(&self, query: &str) -> SdkResult<Option<T>> {
        match self.dispatch(query).await? {
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
            None => Ok(None),
        }
    }

    /// Sends a pre-built query and decodes its data.
    ///
    /// A transport failure nobody recovered from yields `Ok(None)`.
    pub async fn find<T: DeserializeOwned>(&self, query: &str) -> SdkResult<Option<T>> {
        match self.try_find(query).await {
            Err(SdkError::UnhandledTransport(error)) => {
                debug!(error = %error, "transport failure mapped to an empty result");
                Ok(None)
            }
            other => other,
        }
    }

    /// Runs a `selectAll` query and returns its result block.
    pub async fn select_all(&self, query: &SelectQuery) -> SdkResult<Option<SelectAllResultType>> {
        query.expect_operation(Operation::SelectAll)?;
        let envelope: Option<SelectAllQueryType> = self.find(&query.build()?).await?;
        Ok(envelope.and_then(|e| e.select_all))
    }

    /// Runs a `selectOne` query and returns its result block.
    pub async fn select_one(&self, query: &SelectQuery) -> SdkResult<Option<SelectOneResultType>> {
        query.expect_operation(Operation::SelectOne)?;
        let envelope: Option<SelectOneQueryType> = self.find(&query.build()?).await?;
        Ok(envelope.and_then(|e| e.select_one))
    }

    /// Fetches one entity by id.
    ///
    /// `data_selector` names the entity and its fields, e.g.
    /// `selector! { partner { id, name } }`. When pagination is supplied
    /// without a page, the first page is requested.
    pub async fn find_one_by_id<T: DeserializeOwned>(
        &self,
        id: impl ToString,
        data_selector: &Selector,
        pagination: Option<PaginationOptions>,
    ) -> SdkResult<Option<T>> {
        let query = SelectQuery::from_data_selector(Operation::SelectOne, data_selector)?;
        self.fetch_one(query, id, pagination).await
    }

    /// Fetches one `E` by id.
    pub async fn find_by_id<E: Entity>(
        &self,
        id: impl ToString,
        fields: Selector,
        pagination: Option<PaginationOptions>,
    ) -> SdkResult<Option<E>> {
        self.fetch_one(SelectQuery::select_one(E::TAG, fields), id, pagination)
            .await
    }

    /// Lists `E` entities with every pagination field.
    pub async fn find_all<E: Entity>(
        &self,
        fields: Selector,
        arguments: Arguments,
    ) -> SdkResult<Option<EntityPage<E>>> {
        let query = SelectQuery::select_all(E::TAG, fields)
            .arguments(arguments)
            .with_all_pagination_fields();
        let envelope: Option<Value> = self.find(&query.build()?).await?;
        unwrap_page(envelope, E::TAG)
    }

    pub async fn find_partner_by_id(
        &self,
        id: impl ToString,
        fields: Selector,
        pagination: Option<PaginationOptions>,
    ) -> SdkResult<Option<PartnerType>> {
        self.find_by_id(id, fields, pagination).await
    }

    pub async fn find_end_customer_by_id(
        &self,
        id: impl ToString,
        fields: Selector,
        pagination: Option<PaginationOptions>,
    ) -> SdkResult<Option<EndCustomerType>> {
        self.find_by_id(id, fields, pagination).await
    }

    pub async fn find_arrow_company_by_id(
        &self,
        id: impl ToString,
        fields: Selector,
        pagination: Option<PaginationOptions>,
    ) -> SdkResult<Option<ArrowCompanyType>> {
        self.find_by_id(id, fields, pagination).await
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        query: SelectQuery,
        id: impl ToString,
        pagination: Option<PaginationOptions>,
    ) -> SdkResult<Option<T>> {
        let mut arguments = Arguments::by_id(id);
        if let Some(pagination) = pagination {
            arguments = arguments.paginate(pagination.or_first_page());
        }
        let entity = query.entity;
        let query = query.arguments(arguments);

        let envelope: Option<Value> = self.find(&query.build()?).await?;
        unwrap_entity(envelope, Operation::SelectOne, entity)
    }
}

/// Turns a delivered payload into its data, raising top-level errors.
fn accept(payload: GraphqlPayload) -> SdkResult<Option<Value>> {
    if let Some(error) = payload.first_error() {
        return Err(SdkError::api_response(error.message.as_str()));
    }
    Ok(payload.data.filter(|data| !data.is_null()))
}
