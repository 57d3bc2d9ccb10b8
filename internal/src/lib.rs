use std::sync::Arc;
use std::time as stdtime;

use model::instance::Instance;
use model::serialisation::load_instance_from_json;
use solution::json_serialisation::planning_to_json;
use solver::alns::Alns;
use solver::Solver;

/// Loads the instance from its json form, plans it with the ALNS and
/// returns the three output views (leg use, ad-hoc legs, routes per order).
pub fn run(input_data: serde_json::Value) -> Result<serde_json::Value, String> {
    let instance = Arc::new(load_instance_from_json(input_data)?);
    Ok(run_instance(instance))
}

pub fn run_instance(instance: Arc<Instance>) -> serde_json::Value {
    let start_time = stdtime::Instant::now();
    println!(
        "instance with {} locations, {} legs, {} orders and {} containers loaded",
        instance.locations().len(),
        instance.timetable().number_of_legs(),
        instance.number_of_orders(),
        instance.number_of_containers(),
    );

    let alns = Alns::initialize(instance);
    let mut planning = alns.solve();
    planning.make_unique_adhoc();

    println!("\nFinal planning:");
    planning.print_trajecten();
    println!("running time: {:0.2}sec", start_time.elapsed().as_secs_f32());

    planning_to_json(&planning)
}
