#![allow(dead_code)]

use squash_analyzer::migration::MigrationSource;
use std::env;
use std::fs;
use std::path::Path;

/// Builds a migration source wrapping `up` in the usual class scaffolding.
pub fn migration(name: &str, up: &str) -> MigrationSource {
    let text = format!(
        r#"<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

class Migration{index} extends Migration
{{
    /**
     * Run the migrations.
     */
    public function up()
    {{
{up}
    }}

    public function down()
    {{
        Schema::dropIfExists('should_never_be_replayed');
        Schema::create('should_never_be_replayed', function (Blueprint $table) {{
            $table->increments('id');
        }});
    }}
}}
"#,
        index = name.len(),
    );
    MigrationSource::new(name, text)
}

pub fn assert_script_has(actual: &str, expected_parts: &[&str]) {
    for part in expected_parts {
        assert!(
            actual.contains(part),
            "\nScript missing expected part: {}\nActual script: {}",
            part,
            actual
        );
    }
}

/// Compares against `tests/snapshots/<name>.php`. Set
/// `SQUASH_REGENERATE_TESTS` to rewrite the snapshot instead.
pub fn assert_script_snapshot(actual: &str, name: &str) {
    let snapshot_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("snapshots");
    let snapshot_path = snapshot_dir.join(format!("{}.php", name));

    if env::var("SQUASH_REGENERATE_TESTS").is_ok() {
        fs::create_dir_all(&snapshot_dir).unwrap();
        fs::write(&snapshot_path, actual).expect("Failed to write snapshot");
        return;
    }

    let expected = fs::read_to_string(&snapshot_path).unwrap_or_else(|e| {
        panic!(
            "Missing snapshot {:?} ({}); rerun with SQUASH_REGENERATE_TESTS=1 to create it",
            snapshot_path, e
        )
    });
    assert_eq!(actual, expected, "\nScript mismatch for snapshot: {}", name);
}
