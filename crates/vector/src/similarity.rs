use ndarray::ArrayView1;

/// Cosine similarity between two vectors
///
/// Returns 0.0 when the lengths differ or either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let a = ArrayView1::from(a);
    let b = ArrayView1::from(b);

    let dot_product = a.dot(&b);
    let magnitude_a = a.dot(&a).sqrt();
    let magnitude_b = b.dot(&b).sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    // rounding can push identical vectors slightly past 1.0
    (dot_product / (magnitude_a * magnitude_b)).clamp(-1.0, 1.0)
}
