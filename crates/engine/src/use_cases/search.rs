//! Semantic course search.
//!
//! Course names and the query are normalised, embedded and compared by
//! cosine similarity. Course-name vectors are cached per (course, label) so
//! only new or renamed courses hit the embedding service.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use curricula_domain::{CourseId, CourseSummary};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{CourseRepo, EmbeddingError, EmbeddingPort, RepoError};

/// Abbreviations expanded before embedding, keyed by their upper-case form.
const ABBREVIATIONS: [(&str, &str); 4] = [
    ("PBL", "Project Based Learning"),
    ("ATTT", "An toàn thông tin"),
    ("HTTT", "Hệ thống thông tin"),
    ("CNPM", "Công nghệ phần mềm"),
];

/// Courses whose name mentions this keyword get [`KEYWORD_BOOST`].
const BOOSTED_KEYWORD: &str = "pbl";
const KEYWORD_BOOST: f32 = 0.1;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseMatch {
    pub course_id: CourseId,
    pub code: Option<String>,
    pub label: String,
    pub similarity: f32,
}

type CacheKey = (CourseId, String);

pub struct SearchUseCases {
    courses: Arc<dyn CourseRepo>,
    embedder: Arc<dyn EmbeddingPort>,
    top_k: usize,
    cache: RwLock<HashMap<CacheKey, Vec<f32>>>,
}

impl SearchUseCases {
    pub fn new(courses: Arc<dyn CourseRepo>, embedder: Arc<dyn EmbeddingPort>, top_k: usize) -> Self {
        Self {
            courses,
            embedder,
            top_k,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Top matches for `query`, best first.
    pub async fn search(&self, query: &str) -> Result<Vec<CourseMatch>, SearchError> {
        let normalized = preprocess(query);
        if normalized.is_empty() {
            return Err(SearchError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let courses: Vec<(CourseSummary, String)> = self
            .courses
            .list_catalog_names()
            .await?
            .into_iter()
            .filter_map(|course| {
                let label = course.label.clone()?;
                Some((course, label))
            })
            .collect();

        let query_vector = self.embedder.embed(&normalized).await?;
        let vectors = self.course_vectors(&courses).await?;

        let mut matches: Vec<CourseMatch> = courses
            .into_iter()
            .zip(vectors)
            .map(|((course, label), vector)| {
                let mut similarity = cosine_similarity(&query_vector, &vector);
                if label.to_lowercase().contains(BOOSTED_KEYWORD) {
                    similarity += KEYWORD_BOOST;
                }
                CourseMatch {
                    course_id: course.course_id,
                    code: course.code,
                    label,
                    similarity,
                }
            })
            .collect();

        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(self.top_k);

        tracing::debug!(query = %normalized, results = matches.len(), "Search completed");
        Ok(matches)
    }

    /// Vectors for every course, in input order. Missing ones are embedded
    /// and cached; entries for courses no longer listed are dropped.
    ///
    /// The result is assembled from a snapshot taken under the read lock plus
    /// the freshly embedded vectors, so a concurrent search pruning the shared
    /// cache cannot take a vector away mid-request.
    async fn course_vectors(
        &self,
        courses: &[(CourseSummary, String)],
    ) -> Result<Vec<Vec<f32>>, SearchError> {
        let keys: Vec<CacheKey> = courses
            .iter()
            .map(|(course, label)| (course.course_id.clone(), label.clone()))
            .collect();

        let mut vectors: HashMap<&CacheKey, Vec<f32>> = {
            let cache = self.cache.read().await;
            keys.iter()
                .filter_map(|key| cache.get(key).map(|vector| (key, vector.clone())))
                .collect()
        };

        let mut fresh = Vec::new();
        for key in &keys {
            if vectors.contains_key(key) {
                continue;
            }
            let vector = self.embedder.embed(&preprocess(&key.1)).await?;
            fresh.push((key.clone(), vector.clone()));
            vectors.insert(key, vector);
        }

        {
            let mut cache = self.cache.write().await;
            if !fresh.is_empty() {
                tracing::debug!(count = fresh.len(), "Embedded course names");
                cache.extend(fresh);
            }
            let current: HashSet<&CacheKey> = keys.iter().collect();
            cache.retain(|key, _| current.contains(key));
        }

        keys.iter()
            .map(|key| {
                vectors.get(key).cloned().ok_or_else(|| {
                    SearchError::Embedding(EmbeddingError::InvalidResponse(format!(
                        "no vector for course {}",
                        key.0
                    )))
                })
            })
            .collect()
    }
}

/// Lowercase, drop punctuation, expand known abbreviations.
pub fn preprocess(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();

    cleaned
        .split_whitespace()
        .map(|word| {
            let upper = word.to_uppercase();
            ABBREVIATIONS
                .iter()
                .find(|(short, _)| *short == upper)
                .map_or(word, |(_, long)| *long)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cosine similarity; 0.0 for mismatched or zero-length vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}
