use space_weather_forecast::input::read_bulletin;
use space_weather_forecast::parser::{BulletinLines, ScanPhase, SectionAnchors};
use std::env;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let file_path = if args.len() > 1 {
        args[1].as_str()
    } else {
        "sample-data-files/3-day-forecast.txt"
    };

    println!("Opening bulletin: {file_path}");
    let text = read_bulletin(Some(Path::new(file_path)))?;
    let lines = BulletinLines::new(&text);
    let anchors = SectionAnchors::locate(&lines);

    println!("\nScan phase anchors:");
    for phase in ScanPhase::ANCHORS {
        match anchors.get(phase) {
            Some(idx) => println!("  {phase:<20} line {idx}"),
            None => println!("  {phase:<20} [not found]"),
        }
    }

    println!("\n{}", "=".repeat(100));
    for (idx, line) in lines.iter() {
        match anchors.phase_at(idx) {
            Some(phase) => println!("{idx:4}: {line:<72} <- {phase}"),
            None => println!("{idx:4}: {line}"),
        }
    }

    Ok(())
}
