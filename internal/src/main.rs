use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use model::serialisation::load_instance_from_tables;

fn main() {
    let path = std::env::args()
        .nth(1)
        .expect("usage: single_run <input.json | table-directory>");
    println!("\n---------- RUN: {} ----------", path);

    let output = if Path::new(&path).is_dir() {
        let instance = load_instance_from_tables(Path::new(&path))
            .unwrap_or_else(|error| panic!("invalid input: {}", error));
        internal::run_instance(Arc::new(instance))
    } else {
        let mut file = File::open(&path).expect("Error opening input file");
        let mut input_data = String::new();
        file.read_to_string(&mut input_data)
            .expect("Error reading input file");
        let input_data: serde_json::Value =
            serde_json::from_str(&input_data).expect("Error parsing input file");
        internal::run(input_data).unwrap_or_else(|error| panic!("invalid input: {}", error))
    };

    let output_path = ensure_output_path(&path, "output");
    let file = File::create(output_path).expect("Error creating file");
    serde_json::to_writer_pretty(file, &output).expect("Error writing JSON");
}

fn ensure_output_path(input_path: &str, output_dir_name: &str) -> String {
    let file_name = Path::new(input_path)
        .file_name()
        .expect("Error getting file name")
        .to_str()
        .expect("Error converting file name to string");
    let output_path = format!("{}/output_{}.json", output_dir_name, file_name.trim_end_matches(".json"));
    if let Some(parent_dir) = Path::new(&output_path).parent() {
        fs::create_dir_all(parent_dir).expect("Error creating directories");
    }
    output_path
}
