//! Scripted workbench sessions: TOML steps in, observer events out.

use std::path::Path;
use std::time::{Duration, Instant};

use eyre::{Result, WrapErr};
use extract_core::util::frame_period;
use extract_core::{
    ExtractEvent, ExtractObserver, FrameTimer, MaterialId, Point, PressStatus, Surface, Tool,
    Workbench,
};
use extract_traits::{Clock, ManualClock, MonotonicClock};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceName {
    #[default]
    Board,
    Press,
}

impl From<SurfaceName> for Surface {
    fn from(s: SurfaceName) -> Self {
        match s {
            SurfaceName::Board => Surface::Board,
            SurfaceName::Press => Surface::Press,
        }
    }
}

const fn one() -> u32 {
    1
}

/// One scripted action. Trim steps target the current material unless `material` is given.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Place {
        material: String,
        #[serde(default)]
        surface: SurfaceName,
    },
    Touch {
        tool: String,
        material: Option<String>,
    },
    Cut {
        #[serde(default = "one")]
        count: u32,
        material: Option<String>,
    },
    Rotate {
        angles: Vec<f32>,
        material: Option<String>,
    },
    EndRotate {
        material: Option<String>,
    },
    Scrape {
        start: [f32; 2],
        end: [f32; 2],
        path: Vec<[f32; 2]>,
        material: Option<String>,
    },
    ToPress,
    Hold {
        secs: f32,
    },
    Release,
    Withdraw,
    Unlock,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Place { .. } => "place",
            Step::Touch { .. } => "touch",
            Step::Cut { .. } => "cut",
            Step::Rotate { .. } => "rotate",
            Step::EndRotate { .. } => "end_rotate",
            Step::Scrape { .. } => "scrape",
            Step::ToPress => "to_press",
            Step::Hold { .. } => "hold",
            Step::Release => "release",
            Step::Withdraw => "withdraw",
            Step::Unlock => "unlock",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

pub fn parse_script(s: &str) -> Result<Script> {
    toml::from_str::<Script>(s).wrap_err("parse replay script")
}

pub fn load_script(path: &Path) -> Result<Script> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read replay script {}", path.display()))?;
    parse_script(&text)
}

// ── Output ───────────────────────────────────────────────────────────────────

/// Prints workbench events to stdout, one line each.
#[derive(Debug, Clone, Copy)]
pub enum EventPrinter {
    Human,
    JsonLines,
}

impl EventPrinter {
    pub fn new(json: bool) -> Self {
        if json {
            EventPrinter::JsonLines
        } else {
            EventPrinter::Human
        }
    }
}

pub fn event_json(event: &ExtractEvent) -> serde_json::Value {
    match event {
        ExtractEvent::Progress(p) => json!({
            "event": "progress",
            "material": p.material.as_str(),
            "chop_count": p.chop_count,
            "grind_count": p.grind_count,
            "scrape_count": p.scrape_count,
        }),
        ExtractEvent::Preview { material, bonus } => json!({
            "event": "preview",
            "material": material.as_str(),
            "bonus": bonus.value(),
        }),
        ExtractEvent::PressCompleted(o) => json!({
            "event": "press_completed",
            "material": o.material.as_str(),
            "quality": o.quality.name(),
            "bonus": o.bonus.value(),
            "units_added": o.units_added,
            "total_units": o.total_units,
        }),
        ExtractEvent::PressReleased { material, elapsed } => json!({
            "event": "press_released",
            "material": material.as_str(),
            "elapsed_ms": elapsed.as_millis() as u64,
        }),
    }
}

impl ExtractObserver for EventPrinter {
    fn on_event(&mut self, event: &ExtractEvent) {
        match self {
            EventPrinter::JsonLines => println!("{}", event_json(event)),
            EventPrinter::Human => match event {
                // Too chatty for humans; the log has it at debug.
                ExtractEvent::Progress(p) => tracing::debug!(
                    material = %p.material,
                    chops = p.chop_count,
                    rotations = p.grind_count,
                    strokes = p.scrape_count,
                    "progress"
                ),
                ExtractEvent::Preview { material, bonus } => {
                    println!("{material}: on the press, bonus {bonus}");
                }
                ExtractEvent::PressCompleted(o) => println!(
                    "{}: pressed {} (bonus {}), +{} -> {}",
                    o.material, o.quality, o.bonus, o.units_added, o.total_units
                ),
                ExtractEvent::PressReleased { material, elapsed } => {
                    println!("{material}: released after {:.2}s", elapsed.as_secs_f32());
                }
            },
        }
    }
}

pub fn print_ledger(wb: &Workbench, json: bool) {
    if json {
        let rows: Vec<_> = wb
            .ledger()
            .iter()
            .map(|(id, q, units)| json!({ "material": id.as_str(), "quality": q.name(), "units": units }))
            .collect();
        println!("{}", json!({ "ledger": rows }));
        return;
    }
    if wb.ledger().is_empty() {
        println!("ledger: empty");
        return;
    }
    println!("ledger:");
    for (id, q, units) in wb.ledger().iter() {
        println!("  {id:<16} {q:<10} {units}");
    }
}

// ── Runner ───────────────────────────────────────────────────────────────────

/// Where frame time comes from during a hold.
enum FrameSource {
    /// Time advances instantly by one frame per tick.
    Simulated(ManualClock),
    /// Time is the wall clock; each frame sleeps.
    Realtime(MonotonicClock),
}

impl FrameSource {
    fn clock(&self) -> &dyn Clock {
        match self {
            FrameSource::Simulated(c) => c,
            FrameSource::Realtime(c) => c,
        }
    }

    fn wait(&self, frame: Duration) {
        match self {
            FrameSource::Simulated(c) => c.advance(frame),
            FrameSource::Realtime(_) => std::thread::sleep(frame),
        }
    }
}

/// Drives a workbench through a script, feeding press holds frame by frame.
pub struct Replayer {
    source: FrameSource,
    timer: FrameTimer,
    frame: Duration,
    epoch: Instant,
}

impl Replayer {
    /// Holds run on simulated time and finish instantly.
    pub fn new(fps: u32) -> Self {
        Self::with_source(FrameSource::Simulated(ManualClock::new()), fps)
    }

    /// Holds run on the wall clock, sleeping one frame per tick.
    pub fn realtime(fps: u32) -> Self {
        Self::with_source(FrameSource::Realtime(MonotonicClock::new()), fps)
    }

    fn with_source(source: FrameSource, fps: u32) -> Self {
        let epoch = source.clock().now();
        Self {
            source,
            timer: FrameTimer::new(),
            frame: frame_period(fps),
            epoch,
        }
    }

    /// Session time since the replayer was created (simulated or wall).
    pub fn elapsed_ms(&self) -> u64 {
        self.source.clock().ms_since(self.epoch)
    }

    pub fn run(&mut self, wb: &mut Workbench, script: &Script) -> Result<()> {
        for (idx, step) in script.steps.iter().enumerate() {
            tracing::debug!(step = idx + 1, action = step.name(), "replay step");
            self.apply(wb, step)
                .wrap_err_with(|| format!("step {} ({})", idx + 1, step.name()))?;
        }
        tracing::info!(
            steps = script.steps.len(),
            elapsed_ms = self.elapsed_ms(),
            "replay finished"
        );
        Ok(())
    }

    fn target(wb: &Workbench, material: Option<&String>) -> Option<MaterialId> {
        match material {
            Some(id) => Some(MaterialId::new(id)),
            None => wb.current_material().cloned(),
        }
    }

    fn apply(&mut self, wb: &mut Workbench, step: &Step) -> Result<()> {
        match step {
            Step::Place { material, surface } => {
                wb.place(&MaterialId::new(material), (*surface).into())?;
            }
            Step::Touch { tool, material } => {
                let tool: Tool = tool.parse().map_err(|e: String| eyre::eyre!(e))?;
                if let Some(id) = Self::target(wb, material.as_ref()) {
                    wb.on_tool_touch(&id, tool);
                }
            }
            Step::Cut { count, material } => {
                if let Some(id) = Self::target(wb, material.as_ref()) {
                    for _ in 0..*count {
                        wb.on_cut(&id);
                    }
                }
            }
            Step::Rotate { angles, material } => {
                if let Some(id) = Self::target(wb, material.as_ref()) {
                    for &a in angles {
                        wb.on_rotation_sample(&id, a);
                    }
                }
            }
            Step::EndRotate { material } => {
                if let Some(id) = Self::target(wb, material.as_ref()) {
                    wb.on_rotation_end(&id);
                }
            }
            Step::Scrape {
                start,
                end,
                path,
                material,
            } => {
                if let Some(id) = Self::target(wb, material.as_ref()) {
                    let path: Vec<Point> = path.iter().copied().map(Point::from).collect();
                    wb.on_scrape_stroke(&id, (*start).into(), (*end).into(), &path);
                }
            }
            Step::ToPress => {
                wb.move_to_press()?;
            }
            Step::Hold { secs } => self.hold(wb, *secs)?,
            Step::Release => {
                wb.on_press_released();
                self.timer.reset();
            }
            Step::Withdraw => {
                if wb.withdraw().is_none() {
                    tracing::warn!("withdraw with an empty workbench");
                }
                self.timer.reset();
            }
            Step::Unlock => {
                wb.unlock_handle().unlock();
            }
        }
        Ok(())
    }

    /// Keep the press held for `secs`, or until it completes.
    fn hold(&mut self, wb: &mut Workbench, secs: f32) -> Result<()> {
        if !(secs.is_finite() && secs >= 0.0) {
            eyre::bail!("hold secs must be finite and >= 0, got {secs}");
        }
        let target = extract_core::util::secs_to_duration(secs);
        // Prime the timer so the first frame reports a real delta.
        if wb.press_phase() == extract_core::PressPhase::Idle {
            self.timer.reset();
        }
        self.timer.delta(self.source.clock());

        let mut held = Duration::ZERO;
        while held < target {
            self.source.wait(self.frame.min(target - held));
            let dt = self.timer.delta(self.source.clock());
            held += dt;
            match wb.on_press_held(dt) {
                PressStatus::Holding { .. } => {}
                PressStatus::Completed(_) => {
                    self.timer.reset();
                    return Ok(());
                }
                PressStatus::Idle | PressStatus::Released { .. } => {
                    tracing::warn!("hold ignored; nothing on the press");
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract_core::{Classification, Material, Quality};

    fn bench() -> Workbench {
        Workbench::builder()
            .with_materials([
                Material::new("vetiver", Classification::RootCut),
                Material::new("cedar", Classification::WoodGrind),
            ])
            .build()
            .unwrap()
    }

    #[test]
    fn parses_every_action() {
        let script = parse_script(
            r#"
            [[step]]
            action = "place"
            material = "vetiver"

            [[step]]
            action = "touch"
            tool = "knife"

            [[step]]
            action = "cut"
            count = 3

            [[step]]
            action = "rotate"
            angles = [0.0, 90.0]

            [[step]]
            action = "end_rotate"

            [[step]]
            action = "scrape"
            start = [0.0, 0.0]
            end = [10.0, 0.0]
            path = [[5.0, 1.0], [6.0, -1.0]]

            [[step]]
            action = "to_press"

            [[step]]
            action = "hold"
            secs = 0.5

            [[step]]
            action = "release"

            [[step]]
            action = "withdraw"

            [[step]]
            action = "unlock"
            "#,
        )
        .unwrap();
        let names: Vec<_> = script.steps.iter().map(Step::name).collect();
        assert_eq!(
            names,
            [
                "place", "touch", "cut", "rotate", "end_rotate", "scrape", "to_press", "hold",
                "release", "withdraw", "unlock"
            ]
        );
        assert_eq!(
            script.steps[0],
            Step::Place {
                material: "vetiver".into(),
                surface: SurfaceName::Board
            }
        );
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert!(parse_script("[[step]]\naction = \"juggle\"\n").is_err());
    }

    #[test]
    fn hold_completes_across_steps() {
        let mut wb = bench();
        let script = parse_script(
            r#"
            [[step]]
            action = "place"
            material = "vetiver"

            [[step]]
            action = "cut"
            count = 10

            [[step]]
            action = "to_press"

            [[step]]
            action = "hold"
            secs = 1.0

            [[step]]
            action = "hold"
            secs = 1.5
            "#,
        )
        .unwrap();
        Replayer::new(60).run(&mut wb, &script).unwrap();
        assert_eq!(wb.ledger().count(&MaterialId::new("vetiver"), Quality::Normal), 10);
        assert!(wb.current_material().is_none());
    }

    #[test]
    fn released_hold_does_not_credit() {
        let mut wb = bench();
        let script = parse_script(
            r#"
            [[step]]
            action = "place"
            material = "cedar"
            surface = "press"

            [[step]]
            action = "hold"
            secs = 1.9

            [[step]]
            action = "release"
            "#,
        )
        .unwrap();
        let mut replayer = Replayer::new(30);
        replayer.run(&mut wb, &script).unwrap();
        assert!(wb.ledger().is_empty());
        // 1.9 s of simulated time passed without any sleeping.
        assert!((1899..=1900).contains(&replayer.elapsed_ms()));
        assert_eq!(wb.current_material(), Some(&MaterialId::new("cedar")));
    }

    #[test]
    fn realtime_hold_completes_on_the_wall_clock() {
        let mut wb = Workbench::builder()
            .with_materials([Material::new("vetiver", Classification::RootCut)])
            .with_press(extract_core::PressCfg {
                hold: Duration::from_millis(40),
                batch_size: 10,
            })
            .build()
            .unwrap();
        let script = parse_script(
            r#"
            [[step]]
            action = "place"
            material = "vetiver"

            [[step]]
            action = "cut"
            count = 10

            [[step]]
            action = "to_press"

            [[step]]
            action = "hold"
            secs = 5.0
            "#,
        )
        .unwrap();
        let mut replayer = Replayer::realtime(200);
        replayer.run(&mut wb, &script).unwrap();
        assert!(!wb.ledger().is_empty());
        assert!(wb.current_material().is_none());
        // Completed after the 40 ms hold, long before the scripted 5 s.
        let ms = replayer.elapsed_ms();
        assert!((40..2000).contains(&ms), "elapsed {ms} ms");
    }

    #[test]
    fn state_errors_carry_the_step() {
        let mut wb = bench();
        let script = parse_script("[[step]]\naction = \"to_press\"\n").unwrap();
        let err = Replayer::new(60).run(&mut wb, &script).unwrap_err();
        assert!(format!("{err:#}").contains("step 1 (to_press)"));
        assert!(err.downcast_ref::<extract_core::ExtractError>().is_some());
    }
}
