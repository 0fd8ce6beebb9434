//! Arrival source tests

use intersection_sim::simulation::{ArrivalSource, Direction, PoissonArrivals};

fn sample_mean(rate: f64, seed: u64, draws: u32) -> f64 {
    let mut arrivals = PoissonArrivals::new(rate, Some(seed)).expect("valid rate");
    let total: u64 = (0..draws)
        .map(|_| u64::from(arrivals.draw(Direction::North)))
        .sum();
    total as f64 / f64::from(draws)
}

#[test]
fn test_sample_mean_tracks_small_rate() {
    let mean = sample_mean(0.3, 7, 20_000);
    assert!((mean - 0.3).abs() < 0.03, "mean {}", mean);
}

#[test]
fn test_sample_mean_tracks_large_rate() {
    for rate in [700.0, 2000.0, 5000.0] {
        let mean = sample_mean(rate, 1, 200);
        assert!(
            (mean - rate).abs() < rate * 0.02,
            "mean {} at rate {}",
            mean,
            rate
        );
    }
}

#[test]
fn test_reseed_restarts_stream() {
    let mut arrivals = PoissonArrivals::new(3.0, Some(11)).expect("valid rate");
    let first: Vec<u32> = (0..50).map(|_| arrivals.draw(Direction::East)).collect();

    arrivals.reseed(11);
    let second: Vec<u32> = (0..50).map(|_| arrivals.draw(Direction::East)).collect();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_rate_is_rejected() {
    assert!(PoissonArrivals::new(0.0, None).is_err());
    assert!(PoissonArrivals::new(f64::INFINITY, None).is_err());
}
