use std::path::Path;

use plotters::prelude::*;

use crate::error::{Error, Result};

/// Index of the largest value, the first one wins on ties.
pub fn argmax<T: PartialOrd>(values: impl IntoIterator<Item = T>) -> Option<(usize, T)> {
    let mut best: Option<(usize, T)> = None;
    for (i, v) in values.into_iter().enumerate() {
        let better = match &best {
            Some((_, b)) => v > *b,
            None => true,
        };
        if better {
            best = Some((i, v));
        }
    }
    best
}

pub fn categorical_sample(probs: &[f64], random: f64) -> usize {
    let mut acc: f64 = 0.0;
    for (i, p) in probs.iter().enumerate() {
        acc += p;
        if acc > random {
            return i;
        }
    }
    // rounding can leave the cumulative sum just below `random`
    probs.iter().rposition(|p| *p > 0.0).unwrap_or(0)
}

#[inline(always)]
pub fn from_2d_to_1d(ncol: usize, row: usize, col: usize) -> usize {
    row * ncol + col
}

#[inline(always)]
pub fn from_1d_to_2d(ncol: usize, pos: usize) -> (usize, usize) {
    (pos / ncol, pos % ncol)
}

/// Moves one cell on a `nrow x ncol` grid, clamped at the borders.
#[inline(always)]
pub fn inc(nrow: usize, ncol: usize, row: usize, col: usize, a: usize) -> (usize, usize) {
    match a {
        // left
        0 => (row, col.saturating_sub(1)),
        // down
        1 => ((row + 1).min(nrow - 1), col),
        // right
        2 => (row, (col + 1).min(ncol - 1)),
        // up
        3 => (row.saturating_sub(1), col),
        _ => (row, col),
    }
}

pub fn moving_average(window: usize, vector: &[f64]) -> Vec<f64> {
    let window = window.max(1);
    let mut aux: usize = 0;
    let mut result: Vec<f64> = vec![];
    while aux < vector.len() {
        let end: usize = (aux + window).min(vector.len());
        let slice: &[f64] = &vector[aux..end];
        let r: f64 = slice.iter().sum();
        result.push(r / slice.len() as f64);
        aux = end;
    }
    result
}

/// Draws the mean evaluation reward of every iteration, plus its moving
/// average, into a PNG file.
pub fn plot_rewards<P: AsRef<Path>>(
    path: P,
    title: &str,
    rewards: &[f64],
    moving_average_window: usize,
) -> Result<()> {
    let root = BitMapBackend::new(path.as_ref(), (1024, 768)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| Error::Plot(e.to_string()))?;

    let x_max = rewards.len() as f64 + 1.0;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..x_max, 0f64..1.05f64)
        .map_err(|e| Error::Plot(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("iteration")
        .y_desc("mean reward")
        .draw()
        .map_err(|e| Error::Plot(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(
            rewards.iter().enumerate().map(|(i, r)| ((i + 1) as f64, *r)),
            &BLUE,
        ))
        .map_err(|e| Error::Plot(e.to_string()))?
        .label("reward")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    let window = moving_average_window.max(1);
    let averaged = moving_average(window, rewards);
    chart
        .draw_series(LineSeries::new(
            averaged
                .iter()
                .enumerate()
                .map(|(i, r)| ((i * window + window).min(rewards.len()) as f64, *r)),
            &RED,
        ))
        .map_err(|e| Error::Plot(e.to_string()))?
        .label(format!("moving average ({})", window))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| Error::Plot(e.to_string()))?;

    root.present().map_err(|e| Error::Plot(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax([0.0, 1.0, 1.0, 0.5]), Some((1, 1.0)));
        assert_eq!(argmax([0.0, 0.0, 0.0]), Some((0, 0.0)));
        assert_eq!(argmax(Vec::<f64>::new()), None);
    }

    #[test]
    fn categorical_sample_follows_cumulative_probabilities() {
        let probs = [0.25, 0.5, 0.25];
        assert_eq!(categorical_sample(&probs, 0.0), 0);
        assert_eq!(categorical_sample(&probs, 0.3), 1);
        assert_eq!(categorical_sample(&probs, 0.74), 1);
        assert_eq!(categorical_sample(&probs, 0.9), 2);
        assert_eq!(categorical_sample(&[1.0, 0.0, 0.0], 0.99), 0);
    }

    #[test]
    fn inc_is_clamped_to_the_grid() {
        assert_eq!(inc(4, 4, 0, 0, 0), (0, 0));
        assert_eq!(inc(4, 4, 0, 0, 3), (0, 0));
        assert_eq!(inc(4, 4, 0, 0, 1), (1, 0));
        assert_eq!(inc(4, 4, 3, 3, 2), (3, 3));
        assert_eq!(inc(4, 4, 3, 3, 1), (3, 3));
        assert_eq!(from_1d_to_2d(4, from_2d_to_1d(4, 2, 3)), (2, 3));
    }

    #[test]
    fn moving_average_handles_partial_windows() {
        let v = [1.0, 0.0, 1.0, 1.0, 0.0];
        assert_eq!(moving_average(2, &v), vec![0.5, 1.0, 0.0]);
        assert_eq!(moving_average(0, &v), v.to_vec());
    }
}
