mod common;

use common::FakeOracle;
use heatpump::{
    CycleConfig, CycleError, PropertyOracle, Refrigerant, capacity_chart, cop_chart,
    evaluate_fleet,
};

#[test]
fn default_fleet_keeps_order() {
    let oracle = FakeOracle::new();
    let fleet = evaluate_fleet(&CycleConfig::default(), &oracle, |_| {});

    let order: Vec<_> = fleet.entries().iter().map(|(r, _)| *r).collect();
    assert_eq!(order, Refrigerant::ALL);
    assert!(fleet.failures().is_empty());
    assert_eq!(fleet.len(), 3);
}

#[test]
fn custom_order_reaches_charts() {
    let oracle = FakeOracle::new();
    let config = CycleConfig {
        refrigerants: vec![Refrigerant::R744, Refrigerant::R134a],
        ..CycleConfig::default()
    };
    let fleet = evaluate_fleet(&config, &oracle, |_| {});

    for chart in [cop_chart(&fleet), capacity_chart(&fleet)] {
        let labels: Vec<_> = chart.bars.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["R744", "R134a"]);
    }
}

#[test]
fn one_failing_refrigerant_does_not_stop_the_rest() {
    let oracle = FakeOracle::failing_for(Refrigerant::R32);
    let mut seen = Vec::new();
    let fleet = evaluate_fleet(&CycleConfig::default(), &oracle, |outcome| {
        seen.push(match outcome {
            Ok(r) => (r.refrigerant, true),
            Err(e) => (e.refrigerant(), false),
        });
    });

    assert_eq!(
        seen,
        [
            (Refrigerant::R134a, true),
            (Refrigerant::R32, false),
            (Refrigerant::R744, true),
        ]
    );

    let order: Vec<_> = fleet.entries().iter().map(|(r, _)| *r).collect();
    assert_eq!(order, [Refrigerant::R134a, Refrigerant::R744]);
    assert_eq!(fleet.failures().len(), 1);
    assert_eq!(fleet.failures()[0].refrigerant, Refrigerant::R32);
    assert!(matches!(
        fleet.failures()[0].error,
        CycleError::PropertyLookup { .. }
    ));

    // The failed refrigerant has no bar
    let chart = cop_chart(&fleet);
    assert_eq!(chart.bars.len(), 2);
}

#[test]
fn fleet_results_match_single_evaluations() {
    let oracle = FakeOracle::new();
    let config = CycleConfig::default();
    let fleet = evaluate_fleet(&config, &oracle, |_| {});

    for refrigerant in Refrigerant::ALL {
        let single = heatpump::evaluate(&config.inputs_for(refrigerant), &config, &oracle).unwrap();
        assert_eq!(fleet.get(refrigerant), Some(&single));
    }
}

#[test]
fn boxed_oracle_is_accepted() {
    let oracle: Box<dyn PropertyOracle> = Box::new(FakeOracle::new());
    let fleet = evaluate_fleet(&CycleConfig::default(), &oracle, |_| {});
    assert_eq!(fleet.len(), 3);
}

#[test]
fn chart_limits_follow_fleet_values() {
    let oracle = FakeOracle::new();
    let fleet = evaluate_fleet(&CycleConfig::default(), &oracle, |_| {});

    let cop = cop_chart(&fleet);
    let max_cop = fleet.results().map(|r| r.cop_actual).fold(f64::MIN, f64::max);
    assert_eq!(cop.y_max, max_cop + 1.0);

    let capacity = capacity_chart(&fleet);
    let kw: Vec<f64> = fleet.results().map(|r| r.cooling_capacity / 1000.0).collect();
    let bars: Vec<f64> = capacity.bars.iter().map(|(_, v)| *v).collect();
    assert_eq!(bars, kw);
}
