const COMMANDS: &[&str] = &[
    "configure",
    "enable",
    "disable",
    "execute",
    "is_active",
    "get_status",
];

fn main() {
    tauri_plugin::Builder::new(COMMANDS)
        .android_path("android")
        .build();
}
