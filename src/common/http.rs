use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
#[cfg(feature = "https")]
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Runtime;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot send request: {0}")]
    HyperError(#[from] hyper::Error),
    #[error("cannot send request: {0}")]
    HyperUtilError(#[from] hyper_util::client::legacy::Error),
    #[error("runtime error: {0}")]
    RuntimeError(#[from] tokio::task::JoinError),
    #[error("cannot set up TLS: {0}")]
    TlsSetupError(String),
}

/// The transport seam of the admin client. Implementations send one request and return
/// the complete response; they do not interpret status codes.
#[async_trait]
pub trait HttpClient {
    async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Error>;
}

/// The default [HttpClient] built on the `hyper` legacy client.
///
/// When a runtime is provided, requests are executed on it. This allows the blocking API
/// to be used from threads that do not run inside a Tokio runtime.
pub struct HyperHttpClient {
    runtime: Option<Arc<Runtime>>,
    #[cfg(feature = "https")]
    client: Arc<Client<HttpsConnector<HttpConnector>, Full<Bytes>>>,
    #[cfg(not(feature = "https"))]
    client: Arc<Client<HttpConnector, Full<Bytes>>>,
}

impl HyperHttpClient {
    #[cfg(feature = "https")]
    pub fn new(runtime: Option<Arc<Runtime>>) -> Result<Self, Error> {
        // see https://github.com/rustls/rustls/issues/1938
        if rustls::crypto::CryptoProvider::get_default().is_none() {
            // Another thread may have won the race, which is fine.
            let _ = rustls::crypto::ring::default_provider().install_default();
        }

        let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| Error::TlsSetupError(e.to_string()))?
            .https_or_http()
            .enable_http1()
            .build();

        Ok(Self {
            runtime,
            client: Arc::new(Client::builder(TokioExecutor::new()).build(https_connector)),
        })
    }

    #[cfg(not(feature = "https"))]
    pub fn new(runtime: Option<Arc<Runtime>>) -> Result<Self, Error> {
        Ok(Self {
            runtime,
            client: Arc::new(Client::builder(TokioExecutor::new()).build(HttpConnector::new())),
        })
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>, Error> {
        let (req_parts, req_body) = req.into_parts();
        let hyper_req = Request::from_parts(req_parts, Full::new(req_body));

        let client = self.client.clone();
        let exchange = async move {
            let res = client.request(hyper_req).await?;
            let (res_parts, res_body) = res.into_parts();
            let body = res_body.collect().await?.to_bytes();
            Ok::<_, Error>(Response::from_parts(res_parts, body))
        };

        match self.runtime.clone() {
            Some(rt) => rt.spawn(exchange).await?,
            None => exchange.await,
        }
    }
}
