use std::time::Duration;

use extract_core::mocks::RecordingObserver;
use extract_core::{
    Bonus, Classification, ExtractError, ExtractEvent, Material, MaterialId, Point, PressCfg,
    PressPhase, PressStatus, Quality, Surface, Tool, Workbench,
};
use rstest::rstest;

fn catalog() -> Vec<Material> {
    vec![
        Material::new("vetiver", Classification::RootCut).with_display_name("Vetiver Root"),
        Material::new("sandalwood", Classification::WoodGrind),
        Material::new("bergamot", Classification::RindScrape),
    ]
}

fn bench() -> Workbench {
    Workbench::builder()
        .with_materials(catalog())
        .build()
        .expect("default workbench builds")
}

fn id(s: &str) -> MaterialId {
    MaterialId::new(s)
}

/// Hold the press in one-second frames until something other than Holding comes back.
fn press_until_done(wb: &mut Workbench) -> PressStatus {
    for _ in 0..10 {
        match wb.on_press_held(Duration::from_secs(1)) {
            PressStatus::Holding { .. } => continue,
            other => return other,
        }
    }
    panic!("press never completed");
}

fn cut_n(wb: &mut Workbench, m: &MaterialId, n: u32) {
    for _ in 0..n {
        wb.on_tool_touch(m, Tool::Knife);
        wb.on_cut(m);
    }
}

#[test]
fn ten_cuts_press_to_normal() {
    let mut wb = bench();
    let v = id("vetiver");
    wb.place(&v, Surface::Board).unwrap();
    cut_n(&mut wb, &v, 10);

    let preview = wb.move_to_press().unwrap();
    assert_eq!(preview, Bonus::NEUTRAL);

    let PressStatus::Completed(outcome) = press_until_done(&mut wb) else {
        panic!("expected completion");
    };
    assert_eq!(outcome.quality, Quality::Normal);
    assert_eq!(outcome.units_added, 10);
    assert_eq!(outcome.total_units, 10);
    assert_eq!(wb.ledger().count(&v, Quality::Normal), 10);
    assert!(wb.current_material().is_none());
    assert!(wb.trim_state(&v).is_none());
}

#[rstest]
#[case(0, Quality::Low)]
#[case(5, Quality::Low)]
#[case(9, Quality::Normal)]
#[case(12, Quality::Good)]
#[case(15, Quality::Good)] // Excellent downgraded while locked
#[case(30, Quality::Good)]
fn root_cut_grades(#[case] cuts: u32, #[case] expected: Quality) {
    let mut wb = bench();
    let v = id("vetiver");
    wb.place(&v, Surface::Board).unwrap();
    cut_n(&mut wb, &v, cuts);
    wb.move_to_press().unwrap();
    let PressStatus::Completed(outcome) = press_until_done(&mut wb) else {
        panic!("expected completion");
    };
    assert_eq!(outcome.quality, expected);
}

#[test]
fn unlocked_workbench_grants_excellent() {
    let mut wb = bench();
    let handle = wb.unlock_handle();
    assert!(handle.unlock());
    assert!(!handle.unlock());
    assert!(wb.is_excellent_unlocked());

    let v = id("vetiver");
    wb.place(&v, Surface::Board).unwrap();
    cut_n(&mut wb, &v, 15);
    wb.move_to_press().unwrap();
    let PressStatus::Completed(outcome) = press_until_done(&mut wb) else {
        panic!("expected completion");
    };
    assert_eq!(outcome.quality, Quality::Excellent);
    assert_eq!(outcome.bonus, Bonus::CEILING);
}

#[test]
fn wrong_tool_floors_the_bonus() {
    let mut wb = bench();
    let v = id("vetiver");
    wb.place(&v, Surface::Board).unwrap();
    cut_n(&mut wb, &v, 15);
    wb.on_tool_touch(&v, Tool::Pestle);
    assert_eq!(wb.preview_bonus(&v), Some(Bonus::FLOOR));
}

#[test]
fn releasing_early_keeps_progress() {
    let mut wb = bench();
    let v = id("vetiver");
    wb.place(&v, Surface::Board).unwrap();
    cut_n(&mut wb, &v, 10);
    wb.move_to_press().unwrap();

    let status = wb.on_press_held(Duration::from_millis(1500));
    assert!(matches!(status, PressStatus::Holding { .. }));
    let status = wb.on_press_released();
    assert_eq!(
        status,
        PressStatus::Released {
            elapsed: Duration::from_millis(1500)
        }
    );
    assert_eq!(wb.trim_state(&v).map(|s| s.chop_count()), Some(10));
    assert!(wb.ledger().is_empty());

    // A fresh hold starts from zero.
    let status = wb.on_press_held(Duration::from_millis(1500));
    assert!(matches!(status, PressStatus::Holding { .. }));
    let status = wb.on_press_held(Duration::from_millis(500));
    assert!(matches!(status, PressStatus::Completed(_)));
    assert_eq!(wb.ledger().count(&v, Quality::Normal), 10);
}

#[test]
fn pressing_twice_accumulates_ledger() {
    let mut wb = bench();
    let v = id("vetiver");
    for _ in 0..2 {
        wb.place(&v, Surface::Board).unwrap();
        cut_n(&mut wb, &v, 10);
        wb.move_to_press().unwrap();
        press_until_done(&mut wb);
    }
    assert_eq!(wb.ledger().count(&v, Quality::Normal), 20);
}

#[test]
fn press_bypass_scores_an_untouched_state() {
    let mut wb = bench();
    let s = id("sandalwood");
    wb.place(&s, Surface::Press).unwrap();
    let PressStatus::Completed(outcome) = press_until_done(&mut wb) else {
        panic!("expected completion");
    };
    assert_eq!(outcome.bonus, Bonus::FLOOR);
    assert_eq!(outcome.quality, Quality::Low);
    assert_eq!(wb.ledger().count(&s, Quality::Low), 10);
}

#[test]
fn trim_actions_on_the_press_are_ignored() {
    let mut wb = bench();
    let v = id("vetiver");
    wb.place(&v, Surface::Press).unwrap();
    assert!(wb.on_cut(&v).is_none());
    assert!(wb.trim_state(&v).is_none());
}

#[test]
fn actions_for_other_materials_are_ignored() {
    let mut wb = bench();
    let v = id("vetiver");
    wb.place(&v, Surface::Board).unwrap();
    assert!(wb.on_cut(&id("sandalwood")).is_none());
    assert!(wb.on_cut(&id("nonexistent")).is_none());
    assert!(!wb.on_rotation_end(&id("sandalwood")));
    assert!(wb.trim_state(&id("sandalwood")).is_none());
}

#[test]
fn press_with_empty_workbench_stays_idle() {
    let mut wb = bench();
    assert!(!wb.press_engage());
    assert_eq!(wb.on_press_held(Duration::from_secs(5)), PressStatus::Idle);
    assert_eq!(wb.on_press_released(), PressStatus::Idle);
    assert!(wb.ledger().is_empty());
}

#[test]
fn placement_errors_are_typed() {
    let mut wb = bench();
    let err = wb.place(&id("nope"), Surface::Board).unwrap_err();
    assert_eq!(err, ExtractError::UnknownMaterial("nope".into()));

    wb.place(&id("vetiver"), Surface::Board).unwrap();
    let err = wb.place(&id("bergamot"), Surface::Board).unwrap_err();
    assert_eq!(err, ExtractError::Occupied("vetiver".into()));

    wb.move_to_press().unwrap();
    assert!(matches!(wb.move_to_press(), Err(ExtractError::State(_))));
}

#[test]
fn withdraw_discards_state_and_releases_hold() {
    let rec = RecordingObserver::new();
    let mut wb = Workbench::builder()
        .with_materials(catalog())
        .with_observer(rec.clone())
        .build()
        .unwrap();
    let v = id("vetiver");
    wb.place(&v, Surface::Board).unwrap();
    cut_n(&mut wb, &v, 4);
    wb.move_to_press().unwrap();
    wb.on_press_held(Duration::from_millis(300));

    assert_eq!(wb.withdraw(), Some(v.clone()));
    assert_eq!(wb.press_phase(), PressPhase::Idle);
    assert!(wb.trim_state(&v).is_none());
    assert!(wb.withdraw().is_none());

    let events = rec.events();
    assert!(matches!(
        events.last(),
        Some(ExtractEvent::PressReleased { elapsed, .. }) if *elapsed == Duration::from_millis(300)
    ));

    // Coming back starts from scratch.
    wb.place(&v, Surface::Board).unwrap();
    let progress = wb.on_cut(&v).unwrap();
    assert_eq!(progress.chop_count, 1);
}

#[test]
fn wood_grind_counts_full_turns() {
    let mut wb = bench();
    let s = id("sandalwood");
    wb.place(&s, Surface::Board).unwrap();
    wb.on_tool_touch(&s, Tool::Pestle);
    // Five full turns in 90° steps.
    for step in 0..=20 {
        wb.on_rotation_sample(&s, (step * 90 % 360) as f32);
    }
    assert_eq!(wb.trim_state(&s).map(|t| t.grind_count()), Some(5));
    assert_eq!(wb.preview_bonus(&s), Some(Bonus::NEUTRAL));
}

#[test]
fn ending_a_stroke_resets_the_baseline() {
    let mut wb = bench();
    let s = id("sandalwood");
    wb.place(&s, Surface::Board).unwrap();
    for a in [0.0, 90.0, 180.0] {
        wb.on_rotation_sample(&s, a);
    }
    assert!(wb.on_rotation_end(&s));
    // Jump to a new baseline: no delta from 180 to 10.
    for a in [10.0, 100.0, 190.0] {
        wb.on_rotation_sample(&s, a);
    }
    assert_eq!(wb.trim_state(&s).map(|t| t.grind_count()), Some(1));
}

#[test]
fn straight_scrapes_score_high() {
    let mut wb = bench();
    let b = id("bergamot");
    wb.place(&b, Surface::Board).unwrap();
    wb.on_tool_touch(&b, Tool::Scraper);
    let start = Point::new(0.0, 0.0);
    let end = Point::new(100.0, 0.0);
    let path = [Point::new(25.0, 0.0), Point::new(50.0, 0.0), Point::new(75.0, 0.0)];
    for _ in 0..5 {
        wb.on_scrape_stroke(&b, start, end, &path);
    }
    assert_eq!(wb.preview_bonus(&b), Some(Bonus::CEILING));

    // Average deviation of 10 over an allowed 20 lands on the midpoint.
    let wobbly = [Point::new(50.0, 10.0), Point::new(50.0, -10.0)];
    let mut wb = bench();
    wb.place(&b, Surface::Board).unwrap();
    for _ in 0..5 {
        wb.on_scrape_stroke(&b, start, end, &wobbly);
    }
    let bonus = wb.preview_bonus(&b).unwrap().value();
    assert!((bonus - 1.0).abs() < 1e-5, "bonus = {bonus}");
}

#[test]
fn observer_sees_progress_preview_and_completion() {
    let rec = RecordingObserver::new();
    let mut wb = Workbench::builder()
        .with_materials(catalog())
        .with_press(PressCfg {
            hold: Duration::from_millis(100),
            batch_size: 3,
        })
        .with_observer(rec.clone())
        .build()
        .unwrap();
    let v = id("vetiver");
    wb.place(&v, Surface::Board).unwrap();
    wb.on_tool_touch(&v, Tool::Knife);
    wb.on_cut(&v);
    wb.move_to_press().unwrap();
    wb.on_press_held(Duration::from_millis(100));

    let events = rec.drain();
    assert_eq!(events.len(), 4);
    assert!(matches!(&events[0], ExtractEvent::Progress(p) if p.chop_count == 0));
    assert!(matches!(&events[1], ExtractEvent::Progress(p) if p.chop_count == 1));
    assert!(matches!(&events[2], ExtractEvent::Preview { bonus, .. } if *bonus == Bonus::FLOOR));
    match &events[3] {
        ExtractEvent::PressCompleted(o) => {
            assert_eq!(o.units_added, 3);
            assert_eq!(o.quality, Quality::Low);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(rec.events().is_empty());
}

#[test]
fn seed_stock_sets_counts_and_rejects_unknown() {
    let mut wb = bench();
    let v = id("vetiver");
    wb.seed_stock(&v, Quality::Normal, 4).unwrap();
    wb.seed_stock(&v, Quality::Normal, 7).unwrap();
    assert_eq!(wb.ledger().count(&v, Quality::Normal), 7);
    assert_eq!(
        wb.seed_stock(&id("ghost"), Quality::Low, 1),
        Err(ExtractError::UnknownMaterial("ghost".into()))
    );
    assert_eq!(wb.ledger().materials_in_stock(), vec![v]);
}

#[test]
fn press_credit_is_not_clipped_by_large_stock() {
    let mut wb = bench();
    let v = id("vetiver");
    wb.seed_stock(&v, Quality::Normal, u32::MAX).unwrap();
    wb.place(&v, Surface::Board).unwrap();
    cut_n(&mut wb, &v, 10);
    wb.move_to_press().unwrap();
    let PressStatus::Completed(outcome) = press_until_done(&mut wb) else {
        panic!("expected completion");
    };
    assert_eq!(outcome.total_units, u64::from(u32::MAX) + 10);
    assert_eq!(wb.ledger().count(&v, Quality::Normal), outcome.total_units);
}
