mod common;

use common::migration;
use squash_analyzer::migration::MigrationSource;
use squash_analyzer::replay::{replay_all, Replayer};
use squash_schema::ColumnType;
use squash_types::SquashErrorKind;

fn users_and_teams() -> Vec<MigrationSource> {
    vec![
        migration(
            "2014_10_12_000000_create_users_table.php",
            r#"
        Schema::create('users', function (Blueprint $table) {
            $table->increments('id');
            $table->string('name');
        });
"#,
        ),
        migration(
            "2014_10_13_000000_add_team_to_users.php",
            r#"
        Schema::table('users', function (Blueprint $table) {
            $table->unsignedInteger('team_id');
            $table->foreign('team_id')->references('id')->on('teams');
        });

        Schema::create('teams', function (Blueprint $table) {
            $table->increments('id');
        });
"#,
        ),
    ]
}

#[test]
fn test_users_and_teams_model() {
    let replayer = replay_all(&users_and_teams()).unwrap();
    let model = replayer.model();

    assert_eq!(model.table_names().collect::<Vec<_>>(), vec!["users", "teams"]);

    let users = model.table("users").unwrap();
    assert_eq!(users.columns.keys().collect::<Vec<_>>(), vec!["id", "name", "team_id"]);
    assert_eq!(users.column("team_id").unwrap().ty, ColumnType::UnsignedInteger);
    assert_eq!(users.relationships.len(), 1);
    assert_eq!(users.relationships[0].foreign_table, "teams");
    assert_eq!(users.relationships[0].foreign_column, "id");

    let teams = model.table("teams").unwrap();
    assert_eq!(teams.columns.keys().collect::<Vec<_>>(), vec!["id"]);
    assert!(replayer.diagnostics().is_empty());
}

#[test]
fn test_replay_is_deterministic() {
    let sources = users_and_teams();
    let first = replay_all(&sources).unwrap().into_model();
    let second = replay_all(&sources).unwrap().into_model();
    assert_eq!(first, second);
}

#[test]
fn test_down_direction_is_ignored() {
    let replayer = replay_all(&users_and_teams()).unwrap();
    assert!(!replayer.model().contains("should_never_be_replayed"));
}

#[test]
fn test_create_then_drop_cancels() {
    let sources = vec![
        migration(
            "2015_01_01_000000_create_sessions.php",
            r#"
        Schema::create('sessions', function (Blueprint $table) {
            $table->string('id')->unique();
            $table->text('payload');
            $table->integer('last_activity');
        });
"#,
        ),
        migration(
            "2015_02_01_000000_alter_sessions.php",
            r#"
        Schema::table('sessions', function (Blueprint $table) {
            $table->dropColumn('payload');
            $table->timestamps();
        });
"#,
        ),
        migration(
            "2015_03_01_000000_drop_sessions.php",
            r#"
        Schema::dropIfExists('sessions');
"#,
        ),
    ];

    let replayer = replay_all(&sources).unwrap();
    assert!(replayer.model().is_empty());
}

#[test]
fn test_rename_preserves_structure_and_retargets_foreign_keys() {
    let sources = vec![
        migration(
            "2016_01_01_000000_create_posts.php",
            r#"
        Schema::create('posts', function (Blueprint $table) {
            $table->increments('id');
            $table->string('title', 200);
            $table->softDeletes();
        });

        Schema::create('comments', function (Blueprint $table) {
            $table->increments('id');
            $table->unsignedInteger('post_id');
            $table->foreign('post_id')->references('id')->on('posts')->onDelete('cascade');
        });
"#,
        ),
        migration(
            "2016_02_01_000000_rename_posts.php",
            r#"
        Schema::rename('posts', 'articles');
"#,
        ),
    ];

    let replayer = replay_all(&sources).unwrap();
    let model = replayer.model();

    assert!(!model.contains("posts"));
    let articles = model.table("articles").unwrap();
    assert_eq!(articles.name(), "articles");
    assert_eq!(articles.columns.keys().collect::<Vec<_>>(), vec!["id", "title", "softDeletes"]);
    assert_eq!(articles.column("title").unwrap().parameters.as_deref(), Some("200"));

    let comments = model.table("comments").unwrap();
    assert_eq!(comments.relationships[0].foreign_table, "articles");
    assert_eq!(comments.relationships[0].on_delete.as_deref(), Some("cascade"));
}

#[test]
fn test_column_attribute_accumulation() {
    let sources = vec![
        migration(
            "2017_01_01_000000_create_accounts.php",
            r#"
        Schema::create('accounts', function (Blueprint $table) {
            $table->string('c1');
        });
"#,
        ),
        migration(
            "2017_01_02_000000_unique_c1.php",
            r#"
        Schema::table('accounts', function (Blueprint $table) {
            $table->unique('c1');
        });
"#,
        ),
        migration(
            "2017_01_03_000000_modify_c1.php",
            r#"
        DB::statement('ALTER TABLE accounts MODIFY COLUMN c1 VARCHAR(32) NOT NULL');
"#,
        ),
    ];

    let replayer = replay_all(&sources).unwrap();
    let column = replayer.model().table("accounts").unwrap().column("c1").unwrap().clone();

    assert_eq!(column.ty, ColumnType::String);
    assert!(column.unique);
    assert!(!column.nullable);
    assert_eq!(column.parameters.as_deref(), Some("32"));
    assert!(replayer.diagnostics().is_empty());
}

#[test]
fn test_raw_change_renames_and_promotes() {
    let sources = vec![migration(
        "2017_02_01_000000_orders.php",
        r#"
        Schema::create('orders', function (Blueprint $table) {
            $table->integer('id');
            $table->string('reference');
        });
        DB::statement("ALTER TABLE orders CHANGE id order_id BIGINT NOT NULL AUTO_INCREMENT");
"#,
    )];

    let replayer = replay_all(&sources).unwrap();
    let orders = replayer.model().table("orders").unwrap();

    assert_eq!(orders.columns.keys().collect::<Vec<_>>(), vec!["order_id", "reference"]);
    let order_id = orders.column("order_id").unwrap();
    assert_eq!(order_id.ty, ColumnType::BigIncrements);
    assert!(!order_id.nullable);
    assert_eq!(order_id.parameters, None);
}

#[test]
fn test_raw_alteration_of_unknown_table_is_recoverable() {
    let sources = vec![migration(
        "2017_03_01_000000_modify_ghost.php",
        r#"
        DB::statement('ALTER TABLE ghosts MODIFY name VARCHAR(10)');
"#,
    )];

    let replayer = replay_all(&sources).unwrap();
    assert!(replayer.model().is_empty());
    assert_eq!(replayer.diagnostics().len(), 1);
    assert!(matches!(
        replayer.diagnostics()[0].kind(),
        SquashErrorKind::UnknownTable { table, .. } if table == "ghosts"
    ));
}

#[test]
fn test_raw_alteration_adds_missing_column() {
    let sources = vec![migration(
        "2017_04_01_000000_prices.php",
        r#"
        Schema::create('prices', function (Blueprint $table) {
            $table->increments('id');
        });
        DB::statement('ALTER TABLE prices MODIFY amount DECIMAL(8,2) UNSIGNED NOT NULL');
"#,
    )];

    let replayer = replay_all(&sources).unwrap();
    let amount = replayer.model().table("prices").unwrap().column("amount").unwrap().clone();
    assert_eq!(amount.ty, ColumnType::Decimal);
    assert_eq!(amount.parameters.as_deref(), Some("8,2"));
    assert!(amount.unsigned);
    assert!(matches!(
        replayer.diagnostics()[0].kind(),
        SquashErrorKind::UnknownColumn { column, .. } if column == "amount"
    ));
}

#[test]
fn test_unsupported_operations_are_skipped() {
    let sources = vec![migration(
        "2018_01_01_000000_indexes.php",
        r#"
        Schema::create('visits', function (Blueprint $table) {
            $table->string('email');
            $table->index('email');
            $table->string('ip', 45)->nullable();
        });
"#,
    )];

    let replayer = replay_all(&sources).unwrap();
    let visits = replayer.model().table("visits").unwrap();
    assert_eq!(visits.columns.keys().collect::<Vec<_>>(), vec!["email", "ip"]);

    let diagnostics = replayer.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].is_recoverable());
    assert!(matches!(
        diagnostics[0].kind(),
        SquashErrorKind::UnsupportedOperation { call, table, .. } if call == "index" && table == "visits"
    ));
}

#[test]
fn test_unrecognized_call_aborts() {
    let source = migration(
        "2018_02_01_000000_weird.php",
        r#"
        Schema::table('users', function (Blueprint $table) {
            $table->frobnicate('name');
        });
"#,
    );

    let err = Replayer::new().replay_source(&source).unwrap_err();
    assert!(!err.is_recoverable());
    match err.kind() {
        SquashErrorKind::UnrecognizedCall { call, location } => {
            assert_eq!(call, "frobnicate");
            assert_eq!(location.source, "2018_02_01_000000_weird.php");
        }
        other => panic!("Expected unrecognized call, got {:?}", other),
    }
}

#[test]
fn test_non_schema_sources_are_reported() {
    let seeder = MigrationSource::new(
        "2018_03_01_000000_seed_roles.php",
        "<?php\nclass SeedRoles extends Migration {\n    public function up() {\n        DB::table('roles')->insert(['name' => 'admin']);\n    }\n}\n",
    );
    let mut replayer = Replayer::new();
    assert!(!replayer.replay_source(&seeder).unwrap());

    let rename = migration("2018_03_02_000000_rename.php", "Schema::rename('a', 'b');");
    assert!(replayer.replay_source(&rename).unwrap());
    assert_eq!(replayer.diagnostics().len(), 1);
}

#[test]
fn test_modifiers_and_structural_columns() {
    let sources = vec![migration(
        "2019_01_01_000000_profiles.php",
        r#"
        Schema::create('profiles', function (Blueprint $table) {
            $table->engine = 'InnoDB';
            $table->bigIncrements('id');
            $table->integer('age')->unsigned()->nullable()->default(18);
            $table->enum('status', ['draft', 'live'])->default('draft');
            $table->string('nickname')->nullable(false);
            $table->foreignId('team_id')->constrained();
            $table->foreignId('owner_id')->constrained('users')->cascadeOnDelete();
            $table->rememberToken();
            $table->timestamps();
        });
        Schema::table('profiles', function (Blueprint $table) {
            $table->dropTimestamps();
            $table->dropRememberToken();
            $table->renameColumn('age', 'years');
        });
"#,
    )];

    let replayer = replay_all(&sources).unwrap();
    let profiles = replayer.model().table("profiles").unwrap();

    assert_eq!(profiles.engine.as_deref(), Some("InnoDB"));
    assert_eq!(
        profiles.columns.keys().collect::<Vec<_>>(),
        vec!["id", "years", "status", "nickname", "team_id", "owner_id"]
    );

    let years = profiles.column("years").unwrap();
    assert!(years.unsigned && years.nullable);
    assert_eq!(years.default.as_deref(), Some("18"));

    let status = profiles.column("status").unwrap();
    assert_eq!(status.parameters.as_deref(), Some("['draft', 'live']"));
    assert_eq!(status.default.as_deref(), Some("'draft'"));

    assert!(!profiles.column("nickname").unwrap().nullable);

    let targets: Vec<_> = profiles
        .relationships
        .iter()
        .map(|rel| (rel.local_column.as_str(), rel.foreign_table.as_str(), rel.on_delete.as_deref()))
        .collect();
    assert_eq!(targets, vec![("team_id", "teams", None), ("owner_id", "users", Some("cascade"))]);
}

#[test]
fn test_drop_foreign_and_primary() {
    let sources = vec![migration(
        "2019_02_01_000000_memberships.php",
        r#"
        Schema::create('memberships', function (Blueprint $table) {
            $table->string('code');
            $table->unsignedInteger('user_id');
            $table->unsignedInteger('team_id');
            $table->primary('code');
            $table->foreign('user_id')->references('id')->on('users');
            $table->foreign('team_id')->on('teams')->references('id');
        });
        Schema::table('memberships', function (Blueprint $table) {
            $table->dropForeign('memberships_user_id_foreign');
            $table->dropForeign('team_id');
            $table->dropPrimary();
        });
"#,
    )];

    let replayer = replay_all(&sources).unwrap();
    let memberships = replayer.model().table("memberships").unwrap();
    assert!(memberships.relationships.is_empty());
    assert_eq!(memberships.primary_key, None);
}

#[test]
fn test_dropping_referenced_table_removes_foreign_keys() {
    let mut sources = users_and_teams();
    sources.push(migration(
        "2014_10_14_000000_drop_teams.php",
        "        Schema::drop('teams');",
    ));

    let replayer = replay_all(&sources).unwrap();
    let users = replayer.model().table("users").unwrap();
    assert!(users.relationships.is_empty());
    assert!(users.has_column("team_id"));
}

#[test]
fn test_trailing_comments_do_not_hide_columns() {
    let sources = vec![migration(
        "2020_01_01_000000_create_people.php",
        r#"
        Schema::create('people', function (Blueprint $table) {
            $table->increments('id');
            $table->string('name'); // user's display name
            $table->string('email');
            $table->json('meta'); // shape {a, b}
            $table->string('phone'); /* optional */
            $table->string('city');
        });
"#,
    )];

    let replayer = replay_all(&sources).unwrap();
    let people = replayer.model().table("people").unwrap();
    assert_eq!(
        people.columns.keys().collect::<Vec<_>>(),
        vec!["id", "name", "email", "meta", "phone", "city"]
    );
    assert!(replayer.diagnostics().is_empty());
}

#[test]
fn test_composite_unique_is_unsupported() {
    let sources = vec![migration(
        "2020_02_01_000000_create_members.php",
        r#"
        Schema::create('members', function (Blueprint $table) {
            $table->unsignedInteger('user_id');
            $table->unsignedInteger('team_id');
            $table->string('slug');
            $table->unique(['user_id', 'team_id']);
            $table->unique(['slug'], 'members_slug_unique');
        });
"#,
    )];

    let replayer = replay_all(&sources).unwrap();
    let members = replayer.model().table("members").unwrap();
    assert!(!members.column("user_id").unwrap().unique);
    assert!(!members.column("team_id").unwrap().unique);
    assert!(members.column("slug").unwrap().unique);

    assert_eq!(replayer.diagnostics().len(), 1);
    assert!(matches!(
        replayer.diagnostics()[0].kind(),
        SquashErrorKind::UnsupportedOperation { call, table, .. } if call == "unique" && table == "members"
    ));
}

#[test]
fn test_modern_shorthand_columns() {
    let sources = vec![migration(
        "2020_03_01_000000_create_users_table.php",
        r#"
        Schema::create('users', function (Blueprint $table) {
            $table->id();
            $table->id('legacy_id');
            $table->string('name');
            $table->timestampsTz();
            $table->softDeletesTz();
        });
        Schema::table('users', function (Blueprint $table) {
            $table->dropSoftDeletesTz();
        });
"#,
    )];

    let replayer = replay_all(&sources).unwrap();
    let users = replayer.model().table("users").unwrap();
    assert_eq!(
        users.columns.keys().collect::<Vec<_>>(),
        vec!["id", "legacy_id", "name", "timestampsTz"]
    );
    assert_eq!(users.column("id").unwrap().ty, ColumnType::BigIncrements);
    assert_eq!(users.column("legacy_id").unwrap().ty, ColumnType::BigIncrements);
}

#[test]
fn test_rename_onto_existing_table_is_reported() {
    let sources = vec![migration(
        "2020_04_01_000000_swap.php",
        r#"
        Schema::create('drafts', function (Blueprint $table) {
            $table->increments('id');
        });
        Schema::create('posts', function (Blueprint $table) {
            $table->increments('id');
            $table->string('title');
        });
        Schema::rename('posts', 'drafts');
"#,
    )];

    let replayer = replay_all(&sources).unwrap();
    let drafts = replayer.model().table("drafts").unwrap();
    assert!(drafts.has_column("title"));
    assert_eq!(replayer.model().len(), 1);

    let diagnostics = replayer.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].is_recoverable());
    assert!(matches!(
        diagnostics[0].kind(),
        SquashErrorKind::TableReplaced { table, .. } if table == "drafts"
    ));
}
