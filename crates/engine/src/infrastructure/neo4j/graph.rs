//! Neo4j graph wrapper with per-query timing.

use std::time::Instant;

use futures_util::{Stream, TryStreamExt};
use neo4rs::{Graph, Query, Row};
use std::pin::Pin;

/// Concrete wrapper around `neo4rs::Graph`.
///
/// Every query is timed and reported at `trace` level.
#[derive(Clone)]
pub struct Neo4jGraph {
    inner: Graph,
}

pub struct Neo4jRowStream {
    inner: Pin<Box<dyn Stream<Item = Result<Row, neo4rs::Error>> + Send>>,
}

impl Neo4jRowStream {
    fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Row, neo4rs::Error>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    pub async fn next(&mut self) -> Result<Option<Row>, neo4rs::Error> {
        let next = futures_util::future::poll_fn(|cx| self.inner.as_mut().poll_next(cx)).await;
        match next {
            Some(row) => row.map(Some),
            None => Ok(None),
        }
    }
}

impl Neo4jGraph {
    pub fn new(graph: Graph) -> Self {
        Self { inner: graph }
    }

    fn record(&self, operation: &str, start: Instant) {
        tracing::trace!(
            operation,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "neo4j query finished"
        );
    }

    pub async fn run(&self, query: Query) -> Result<(), neo4rs::Error> {
        let start = Instant::now();
        let result = self.inner.run(query).await;
        self.record("run", start);
        result
    }

    pub async fn execute(&self, query: Query) -> Result<Neo4jRowStream, neo4rs::Error> {
        let start = Instant::now();
        let result = self.inner.execute(query).await;
        self.record("execute", start);
        result.map(|stream| {
            let stream = stream.into_stream();
            let stream = TryStreamExt::into_stream(stream);
            Neo4jRowStream::from_stream(stream)
        })
    }
}
