use std::collections::HashMap;

use idd_rs::interval::Interval;
use idd_rs::manager::IddManager;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let manager = IddManager::<&str, i32>::new();
    manager.internalize_variable("x");
    manager.internalize_variable("y");
    println!("manager = {:?}", manager);

    println!("top = {}", manager.top());
    println!("bottom = {}", manager.bottom());

    let room = manager.from_box(
        &HashMap::from([("x", Interval::closed(0.0, 10.0)), ("y", Interval::closed(0.0, 5.0))]),
        1,
        0,
    );
    println!("room = {}", manager.to_bracket_string(&room));
    let heater = manager.from_box(&HashMap::from([("x", Interval::right_open(2.0, 4.0))]), 3, 0);
    println!("heater = {}", manager.to_bracket_string(&heater));

    let heat = manager.combine(&room, &heater, |a, b| a * b);
    println!("heat =\n{}", manager.to_pretty_string(&heat));
    println!("heat at (3, 1) = {}", manager.lookup(&heat, &HashMap::from([("x", 3.0), ("y", 1.0)])));
    println!("paths = {}", manager.path_count(&heat));

    let values = manager.inf_terminal_cover(&heat, &HashMap::from([("x", Interval::closed(3.5, 7.0))]));
    println!("values over x in [3.5, 7] = {:?}", values);

    println!("{}", manager.to_dot(&[heat])?);

    Ok(())
}
