use grade_calc::components::{from_seed_records, Component, ComponentId, ComponentStore, RawComponent};
use grade_calc::courses::{restore_course, CourseSnapshot};
use grade_calc::grading::{required_final_score, solve_for_final, weighted_average_so_far, Outlook};
use proptest::prelude::*;

fn component_strategy() -> impl Strategy<Value = (f64, Option<f64>)> {
    (0.0f64..100.0, proptest::option::of(0.0f64..150.0))
}

fn build(rows: &[(f64, Option<f64>)]) -> Vec<Component> {
    rows.iter()
        .enumerate()
        .map(|(i, (weight, grade))| {
            let c = Component::new(ComponentId::positional(i), format!("Item {}", i + 1), *weight);
            match grade {
                Some(g) => c.with_grade(*g),
                None => c,
            }
        })
        .collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

fn close_opt(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => close(x, y),
        _ => false,
    }
}

proptest! {
    #[test]
    fn no_grades_means_no_average(weights in proptest::collection::vec(0.0f64..100.0, 0..10)) {
        let rows: Vec<_> = weights.into_iter().map(|w| (w, None)).collect();
        prop_assert_eq!(weighted_average_so_far(&build(&rows)), None);
    }

    #[test]
    fn single_graded_component_is_its_grade(
        weight in 0.01f64..100.0,
        grade in 0.0f64..150.0,
        ungraded in proptest::collection::vec(0.0f64..100.0, 0..5),
    ) {
        let mut rows = vec![(weight, Some(grade))];
        rows.extend(ungraded.into_iter().map(|w| (w, None)));
        let avg = weighted_average_so_far(&build(&rows)).unwrap();
        prop_assert!(close(avg, grade), "{} vs {}", avg, grade);
    }

    #[test]
    fn average_ignores_order(rows in proptest::collection::vec(component_strategy(), 0..12)) {
        let components = build(&rows);
        let mut reversed = components.clone();
        reversed.reverse();
        let mut rotated = components.clone();
        if !rotated.is_empty() {
            rotated.rotate_left(1);
        }
        let base = weighted_average_so_far(&components);
        prop_assert!(close_opt(base, weighted_average_so_far(&reversed)));
        prop_assert!(close_opt(base, weighted_average_so_far(&rotated)));
    }

    #[test]
    fn ungraded_component_does_not_move_average(
        rows in proptest::collection::vec(component_strategy(), 0..12),
        extra_weight in 0.0f64..100.0,
    ) {
        let components = build(&rows);
        let mut extended = components.clone();
        extended.push(Component::new(ComponentId::new("extra"), "Extra", extra_weight));
        prop_assert_eq!(weighted_average_so_far(&components), weighted_average_so_far(&extended));
    }

    #[test]
    fn average_is_finite_when_defined(rows in proptest::collection::vec(component_strategy(), 0..12)) {
        if let Some(avg) = weighted_average_so_far(&build(&rows)) {
            prop_assert!(avg.is_finite());
        }
    }

    #[test]
    fn no_final_means_no_required(
        rows in proptest::collection::vec(component_strategy(), 0..12),
        target in -50.0f64..200.0,
    ) {
        prop_assert_eq!(required_final_score(&build(&rows), None, target).required, None);
    }

    #[test]
    fn zero_weights_never_divide(
        grades in proptest::collection::vec(proptest::option::of(0.0f64..150.0), 1..8),
        target in 0.0f64..100.0,
    ) {
        let rows: Vec<_> = grades.into_iter().map(|g| (0.0, g)).collect();
        let components = build(&rows);
        let final_id = components[0].id.clone();
        prop_assert_eq!(weighted_average_so_far(&components), None);
        prop_assert_eq!(required_final_score(&components, Some(&final_id), target).required, None);
    }

    #[test]
    fn hitting_the_required_score_reaches_the_target(
        rows in proptest::collection::vec((0.01f64..100.0, 0.0f64..150.0), 1..8),
        final_weight in 1.0f64..60.0,
        target in 0.0f64..100.0,
    ) {
        // With every non-final component graded, scoring `required` on the
        // final lands exactly on the target.
        let mut graded: Vec<_> = rows.iter().map(|(w, g)| (*w, Some(*g))).collect();
        graded.push((final_weight, None));
        let mut components = build(&graded);
        let final_id = components.last().unwrap().id.clone();

        let required = required_final_score(&components, Some(&final_id), target)
            .required
            .unwrap();
        let last = components.len() - 1;
        components[last].grade = Some(required);

        let overall = weighted_average_so_far(&components).unwrap();
        prop_assert!(close(overall, target), "{} vs {}", overall, target);
    }

    #[test]
    fn outlook_matches_sign(required in -500.0f64..500.0) {
        let outlook = Outlook::of(required);
        prop_assert_eq!(outlook == Outlook::OutOfReach, required > 100.0);
        prop_assert_eq!(outlook == Outlook::AlreadySecured, required < 0.0);
    }

    #[test]
    fn persistence_roundtrip_preserves_results(
        rows in proptest::collection::vec(component_strategy(), 1..10),
        final_pos in any::<prop::sample::Index>(),
        target in 0.0f64..100.0,
    ) {
        let mut store = ComponentStore::from_components(build(&rows));
        let final_id = store.components()[final_pos.index(rows.len())].id.clone();
        store.set_final(&final_id);

        let json = serde_json::to_string(&CourseSnapshot::from_store(&store)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let restored = restore_course(&value).unwrap().store;

        prop_assert_eq!(restored.final_id(), store.final_id());
        prop_assert!(close_opt(
            weighted_average_so_far(restored.components()),
            weighted_average_so_far(store.components()),
        ));
        prop_assert!(close_opt(
            required_final_score(restored.components(), restored.final_id(), target).required,
            required_final_score(store.components(), store.final_id(), target).required,
        ));
    }
}

#[test]
fn syllabus_scenario_end_to_end() {
    let mut store = from_seed_records(&[
        RawComponent::seed("Assignments", 20.0),
        RawComponent::seed("Midterm", 30.0),
        RawComponent::seed("Final", 50.0),
    ]);
    assert_eq!(weighted_average_so_far(store.components()), None);

    let ids: Vec<_> = store.components().iter().map(|c| c.id.clone()).collect();
    store.upsert_field(&ids[0], grade_calc::components::FieldEdit::Grade(Some(80.0)));
    store.upsert_field(&ids[1], grade_calc::components::FieldEdit::Grade(Some(90.0)));
    assert_eq!(weighted_average_so_far(store.components()), Some(86.0));

    store.set_final(&ids[2]);
    let solution = solve_for_final(&store, Some(85.0)).unwrap();
    assert!((solution.required - 84.0).abs() < 1e-9);

    let unreachable = solve_for_final(&store, Some(101.0)).unwrap();
    assert!((unreachable.required - 116.0).abs() < 1e-9);
    assert_eq!(Outlook::of(unreachable.required), Outlook::OutOfReach);
}
