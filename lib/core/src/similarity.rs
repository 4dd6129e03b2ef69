//! TF-IDF cosine-similarity ranking over product names
//!
//! The vector space is rebuilt from the full catalog on every call, so
//! each computation reads one consistent snapshot and there is no shared
//! index to invalidate or lock. Linear in catalog size per request,
//! which is fine for the few hundred products this store carries.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector::Vector;

/// How many similar products a details page shows
pub const RECOMMENDATION_LIMIT: usize = 5;

/// Tokenize a product name for vectorization
///
/// Lowercase, split on whitespace and punctuation, drop single-character
/// fragments.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .map(|s| s.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|s| s.len() > 1)
        .collect()
}

/// TF-IDF vector space fitted over a corpus of product names
///
/// IDF is smoothed as `ln((1 + n) / (1 + df)) + 1`, so a term occurring
/// in every document still gets weight 1 and an empty corpus never
/// divides by zero. Transformed vectors are L2-normalized, which makes
/// cosine similarity a plain dot product.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Fit the vocabulary and IDF weights over a document corpus
    #[must_use]
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let total_docs = documents.len();

        // Document frequency per term
        let mut dfs: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let mut seen: Vec<String> = tokenize(doc.as_ref());
            seen.sort();
            seen.dedup();
            for term in seen {
                *dfs.entry(term).or_insert(0) += 1;
            }
        }

        // Sorted vocabulary keeps term indices deterministic across calls
        let mut terms: Vec<String> = dfs.keys().cloned().collect();
        terms.sort();

        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (index, term) in terms.into_iter().enumerate() {
            let df = dfs[&term];
            let weight = ((1.0 + total_docs as f32) / (1.0 + df as f32)).ln() + 1.0;
            vocabulary.insert(term, index);
            idf.push(weight);
        }

        Self { vocabulary, idf }
    }

    #[inline]
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Project a document into the fitted space as an L2-normalized
    /// TF-IDF vector
    ///
    /// Terms outside the fitted vocabulary are ignored; a document with
    /// no known terms maps to the zero vector.
    #[must_use]
    pub fn transform(&self, text: &str) -> Vector {
        let mut vector = Vector::zeros(self.vocabulary.len());
        let weights = vector.as_mut_slice();

        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                weights[index] += self.idf[index];
            }
        }

        vector.normalize();
        vector
    }
}

/// A catalog product ranked by similarity to the query product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    pub product_id: i64,
    pub score: f32,
}

/// Rank catalog products by name similarity to the target product
///
/// `catalog` is a read-only snapshot of (id, name) pairs in catalog
/// iteration order. The target must be part of the snapshot; it is
/// excluded from the result by identifier. Scores sort descending with
/// ties kept in catalog order, truncated to `limit`, so the result
/// length is always `min(limit, catalog.len() - 1)`.
pub fn recommend(
    target_id: i64,
    catalog: &[(i64, String)],
    limit: usize,
) -> Result<Vec<ScoredProduct>> {
    // Unknown targets fail before any vectorization work
    let target_pos = catalog
        .iter()
        .position(|(id, _)| *id == target_id)
        .ok_or(Error::ProductNotFound(target_id))?;

    if catalog.len() <= 1 {
        return Ok(Vec::new());
    }

    let names: Vec<&str> = catalog.iter().map(|(_, name)| name.as_str()).collect();
    let vectorizer = TfidfVectorizer::fit(&names);

    let target_vector = vectorizer.transform(names[target_pos]);

    // Vectors come back normalized, so the linear kernel is cosine
    let scores: Vec<f32> = names
        .iter()
        .map(|name| target_vector.dot(&vectorizer.transform(name)))
        .collect();

    let mut ranked: Vec<usize> = (0..catalog.len()).filter(|&i| i != target_pos).collect();
    ranked.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));
    ranked.truncate(limit);

    Ok(ranked
        .into_iter()
        .map(|i| ScoredProduct {
            product_id: catalog[i].0,
            score: scores[i],
        })
        .collect())
}
