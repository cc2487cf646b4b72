//! Snapshot tests for the TypeScript generators, run through a full session.

use std::path::Path;

use shapegen_codegen::{
    GenerationSession, GeneratorRegistry,
    testing::{RecordingSink, TestWorkspace, sample_model},
};
use shapegen_codegen_typescript::{CATEGORY, TypeScriptGenerators};
use shapegen_core::{GenerationSwitch, GenerationTarget, LanguageWithVersion, Level, Settings};
use shapegen_model::{Model, Shape, ShapeId, ShapeKind, Traits};

const DIR: &str = "typescript/model/com.example";

fn session(ws: &TestWorkspace, settings: Settings) -> GenerationSession {
    GenerationSession::builder(GeneratorRegistry::new().with(TypeScriptGenerators::new()))
        .language(LanguageWithVersion::parse("typescript"))
        .target(GenerationTarget::MODEL)
        .settings(settings)
        .destinations(ws.resolver())
        .build()
        .unwrap()
}

fn generate(ws: &TestWorkspace, model: &Model) -> RecordingSink {
    let sink = RecordingSink::new();
    session(ws, Settings::default())
        .generate(model, |_| true, &sink.logger())
        .unwrap()
        .commit()
        .unwrap();
    sink
}

fn read(root: &Path, file: &str) -> String {
    let relative = format!("{}/{}", DIR, file);
    std::fs::read_to_string(root.join(&relative))
        .unwrap_or_else(|e| panic!("{}: {}", relative, e))
}

#[test]
fn test_bounded_number_module() {
    let ws = TestWorkspace::new();
    generate(&ws, &sample_model());
    insta::assert_snapshot!("bounded_number_module", read(ws.root(), "percent.ts"));
}

#[test]
fn test_branded_string_module() {
    let ws = TestWorkspace::new();
    generate(&ws, &sample_model());
    insta::assert_snapshot!("branded_string_module", read(ws.root(), "name.ts"));
}

#[test]
fn test_enum_module() {
    let ws = TestWorkspace::new();
    generate(&ws, &sample_model());
    insta::assert_snapshot!("enum_module", read(ws.root(), "color.ts"));
}

#[test]
fn test_structure_module() {
    let ws = TestWorkspace::new();
    generate(&ws, &sample_model());
    insta::assert_snapshot!("structure_module", read(ws.root(), "person.ts"));
}

#[test]
fn test_index_module() {
    let ws = TestWorkspace::new();
    generate(&ws, &sample_model());
    insta::assert_snapshot!("index_module", read(ws.root(), "index.ts"));
}

#[test]
fn test_generated_tree() {
    let ws = TestWorkspace::new();
    generate(&ws, &sample_model());
    let files: Vec<String> = ws
        .snapshot()
        .into_iter()
        .map(|(path, _)| path)
        .filter(|path| !path.ends_with('/'))
        .collect();
    insta::assert_snapshot!("generated_tree", files.join("\n"));
}

/// `Team` is declared before `Member` but refers to it.
fn team_model() -> Model {
    let mut model = Model::new();
    let team = ShapeId::new("com.example", "Team");
    let member = ShapeId::new("com.example", "Member");
    let members = ShapeId::new("com.example", "Members");
    model.insert(Shape::new(team.clone(), ShapeKind::Structure { members: vec![] }));
    model.insert(Shape::new(
        members.clone(),
        ShapeKind::List {
            member: member.clone(),
        },
    ));
    model.insert(Shape::new(member.clone(), ShapeKind::Structure { members: vec![] }));
    model
        .add_member(&team, "members", members, Traits::default().required())
        .unwrap();
    model
        .add_member(&member, "handle", ShapeId::prelude("String"), Traits::default().required())
        .unwrap();
    model
}

#[test]
fn test_dependencies_generated_first() {
    let ws = TestWorkspace::new();
    let sink = RecordingSink::new();
    let results = session(&ws, Settings::default())
        .generate(&team_model(), |_| true, &sink.logger())
        .unwrap();

    let names: Vec<String> = results
        .destinations()
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["member.ts", "members.ts", "team.ts"]);

    let registered = results.context().registered_paths(CATEGORY);
    assert_eq!(registered.len(), 3);
    assert!(registered.iter().all(|p| p.extension().is_some_and(|e| e == "ts")));

    results.commit().unwrap();
    assert_eq!(
        read(ws.root(), "index.ts"),
        "export * from \"./member\";\nexport * from \"./members\";\nexport * from \"./team\";\n"
    );
    assert_eq!(
        read(ws.root(), "team.ts"),
        "import type { Members } from \"./members\";\n\
         \n\
         export interface Team {\n  readonly members: Members;\n}\n"
    );
    assert_eq!(
        read(ws.root(), "members.ts"),
        "import type { Member } from \"./member\";\n\
         \n\
         export type Members = ReadonlyArray<Member>;\n"
    );
}

#[test]
fn test_dry_run_writes_nothing() {
    let ws = TestWorkspace::new();
    let sink = RecordingSink::new();
    let settings = Settings::builder()
        .with_switch(GenerationSwitch::DryRun)
        .build();
    session(&ws, settings)
        .generate(&sample_model(), |_| true, &sink.logger())
        .unwrap()
        .commit()
        .unwrap();

    assert!(ws.snapshot().is_empty());
    assert!(sink.contains(Level::Info, "would write"));
    assert!(sink.contains(Level::Info, "index.ts"));
}

#[test]
fn test_compile_setting_queues_tsc() {
    let ws = TestWorkspace::new();
    let sink = RecordingSink::new();
    let settings = Settings::builder()
        .with_switch(GenerationSwitch::DryRun)
        .with_string("typescript.compile", "true")
        .build();
    session(&ws, settings)
        .generate(&sample_model(), |_| true, &sink.logger())
        .unwrap()
        .commit()
        .unwrap();

    assert!(sink.contains(Level::Info, "would run npx tsc --noEmit"));
}

#[test]
fn test_service_member_is_fatal() {
    let ws = TestWorkspace::new();
    let mut model = Model::new();
    let service = ShapeId::new("com.example", "Api");
    model.insert(Shape::new(
        service.clone(),
        ShapeKind::Service {
            version: "1".into(),
            operations: vec![],
            resources: vec![],
        },
    ));
    let holder = ShapeId::new("com.example", "Holder");
    model.insert(Shape::new(holder.clone(), ShapeKind::Structure { members: vec![] }));
    model
        .add_member(&holder, "api", service, Traits::default())
        .unwrap();

    let sink = RecordingSink::new();
    let err = session(&ws, Settings::default())
        .generate(&model, |_| true, &sink.logger())
        .unwrap_err();
    assert!(err.to_string().contains("member 'api' has no TypeScript type"));
    assert!(ws.snapshot().is_empty());
}

#[test]
fn test_regenerating_keeps_single_index_entry_per_module() {
    let ws = TestWorkspace::new();
    let session = session(&ws, Settings::default());
    let logger = RecordingSink::new().logger();
    for _ in 0..2 {
        session
            .generate(&sample_model(), |_| true, &logger)
            .unwrap()
            .commit()
            .unwrap();
    }
    assert_eq!(read(ws.root(), "index.ts").lines().count(), 4);
}
