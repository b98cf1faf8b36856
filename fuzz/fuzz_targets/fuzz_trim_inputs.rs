#![no_main]
use std::time::Duration;

use extract_core::{Classification, Material, MaterialId, Point, Surface, Tool, Workbench};
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Input {
    Touch(u8),
    Cut,
    Rotate(f32),
    EndRotate,
    Scrape((f32, f32), (f32, f32), Vec<(f32, f32)>),
    Hold(u16),
    Release,
}

fuzz_target!(|data: (u8, Vec<Input>)| {
    let (which, inputs) = data;
    let classification = match which % 3 {
        0 => Classification::RootCut,
        1 => Classification::WoodGrind,
        _ => Classification::RindScrape,
    };
    let Ok(mut wb) = Workbench::builder()
        .with_materials([Material::new("m", classification)])
        .build()
    else {
        return;
    };
    let id = MaterialId::new("m");
    if wb.place(&id, Surface::Board).is_err() {
        return;
    }
    for input in &inputs {
        match input {
            Input::Touch(t) => {
                wb.on_tool_touch(&id, Tool::ALL[usize::from(*t) % Tool::ALL.len()]);
            }
            Input::Cut => {
                wb.on_cut(&id);
            }
            Input::Rotate(a) => {
                wb.on_rotation_sample(&id, *a);
            }
            Input::EndRotate => {
                wb.on_rotation_end(&id);
            }
            Input::Scrape(s, e, path) => {
                let path: Vec<Point> = path.iter().copied().map(Point::from).collect();
                wb.on_scrape_stroke(&id, (*s).into(), (*e).into(), &path);
            }
            Input::Hold(_) | Input::Release => {}
        }
        if let Some(b) = wb.preview_bonus(&id) {
            assert!((0.5..=1.5).contains(&b.value()));
        }
    }
    if wb.move_to_press().is_err() {
        return;
    }
    for input in &inputs {
        match input {
            Input::Hold(ms) => {
                wb.on_press_held(Duration::from_millis(u64::from(*ms)));
            }
            Input::Release => {
                wb.on_press_released();
            }
            _ => {}
        }
    }
});
