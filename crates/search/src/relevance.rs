use outfitter_common::Product;
use outfitter_vector::ScoredRecord;

/// A candidate is relevant only when its score is strictly above the threshold
pub fn is_relevant(score: f32, threshold: f32) -> bool {
    score > threshold
}

/// Product of the best candidate, if it clears the threshold
pub fn select_match(best: Option<&ScoredRecord>, threshold: f32) -> Option<Product> {
    best.filter(|candidate| is_relevant(candidate.score, threshold))
        .map(|candidate| candidate.record.to_product())
}
