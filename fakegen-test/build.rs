use fakegen::FakeGenerator;

fn main() {
    cc::Build::new()
        .include("src")
        .warnings(false)
        .file("src/thermostat.c")
        .compile("thermostat");
    println!("cargo:rerun-if-changed=src/thermostat.c");
    println!("cargo:rerun-if-changed=src/thermostat.h");
    println!("cargo:rerun-if-changed=src/hal.h");

    FakeGenerator::new()
        .header("hal.h")
        .include("src")
        .arg_history_len(16)
        .generate("src/hal.rs", "hal_fakes.rs")
        .unwrap();
}
