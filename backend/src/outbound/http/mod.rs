//! Outbound HTTP adapters for `/fetch-url`.

mod dns_resolver;
mod reqwest_fetcher;

pub use dns_resolver::TokioHostResolver;
pub use reqwest_fetcher::ReqwestUrlFetcher;
