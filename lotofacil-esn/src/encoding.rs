use lotofacil_db::models::{Draw, POOL_SIZE};
use ndarray::Array1;

pub const INPUT_DIM: usize = POOL_SIZE;

/// Encode a draw as a 25-dim binary indicator: index (n-1) is 1.0 when n was drawn.
pub fn encode_draw(draw: &Draw) -> Array1<f64> {
    let mut v = Array1::zeros(INPUT_DIM);
    for &n in &draw.numbers {
        v[(n - 1) as usize] = 1.0;
    }
    v
}
