const CONTAINERS: &[(&str, &str)] = &[
    ("bindings/scenario_a.toml", "scenario_a.rs"),
    ("bindings/scenario_b.toml", "scenario_b.rs"),
    ("bindings/swapped.toml", "swapped.rs"),
    ("bindings/request_scope.toml", "request_scope.rs"),
];

fn main() {
    for (manifest, file_name) in CONTAINERS {
        if let Err(e) = direct_di::emit_to_out_dir(manifest, file_name) {
            panic!("generating {file_name} from {manifest} failed: {e}");
        }
    }
}
