//! AWS SDK implementations of the control-plane traits

mod dynamodb;
mod s3;

pub use dynamodb::DynamoDbTables;
pub use s3::S3Buckets;

use std::future::Future;

use aws_config::SdkConfig;

use crate::error::BackendResult;

/// Load shared AWS configuration for a region
///
/// Credentials and profile come from the default provider chain. An endpoint
/// override points both services at a local emulator.
pub async fn load_sdk_config(region: &str, endpoint_url: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    if let Some(endpoint) = endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

/// One page of a list response
#[derive(Debug)]
pub(crate) struct Page {
    pub names: Vec<String>,
    /// Token to pass for the next page; `None` (or empty) on the last page
    pub next: Option<String>,
}

/// Follow a paginated list call to the end, collecting every name
pub(crate) async fn collect_pages<F, Fut>(mut fetch: F) -> BackendResult<Vec<String>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = BackendResult<Page>>,
{
    let mut names = Vec::new();
    let mut token = None;

    loop {
        let page = fetch(token.take()).await?;
        names.extend(page.names);

        match page.next {
            Some(next) if !next.is_empty() => token = Some(next),
            _ => break,
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;

    fn page(names: &[&str], next: Option<&str>) -> Page {
        Page {
            names: names.iter().map(|n| n.to_string()).collect(),
            next: next.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_collect_pages_follows_tokens() {
        let mut pages = vec![
            page(&["a", "b"], Some("b")),
            page(&["c"], Some("c")),
            page(&["state-bucket"], None),
        ]
        .into_iter();
        let mut tokens = Vec::new();

        let names = collect_pages(|token| {
            tokens.push(token);
            std::future::ready(Ok(pages.next().unwrap()))
        })
        .await
        .unwrap();

        assert_eq!(names, vec!["a", "b", "c", "state-bucket"]);
        assert_eq!(
            tokens,
            vec![None, Some("b".to_string()), Some("c".to_string())]
        );
    }

    #[tokio::test]
    async fn test_collect_pages_stops_on_empty_token() {
        let mut calls = 0;
        let names = collect_pages(|_| {
            calls += 1;
            std::future::ready(Ok(page(&["only"], Some(""))))
        })
        .await
        .unwrap();

        assert_eq!(names, vec!["only"]);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_error() {
        let mut calls = 0;
        let result = collect_pages(|token| {
            calls += 1;
            std::future::ready(match token {
                None => Ok(page(&["a"], Some("a"))),
                Some(_) => Err(BackendError::aws("Failed to list buckets: throttled")),
            })
        })
        .await;

        assert!(matches!(result, Err(BackendError::Aws(_))));
        assert_eq!(calls, 2);
    }
}
