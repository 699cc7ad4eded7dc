use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use idea_parser::{finalize, parse, tokenize};

// ============================================================================
// Test Data: Varying Complexity and Size
// ============================================================================

const TINY_IDEA: &str = r#"enum Roles { ADMIN "Admin" }"#;

const SMALL_IDEA: &str = r#"prop Text { type "text" format "lowercase" }

enum Roles {
  ADMIN "Admin"
  USER "User"
}

model User {
  id    String  @id @default("nanoid()")
  name  String  @field.input(Text)
  role  Roles   @default("USER")
}"#;

const MEDIUM_IDEA: &str = r#"plugin "./custom-plugin" {
  provider "custom-client-js"
  previewFeatures ["fullTextSearch"]
}

prop Text { type "text" format "lowercase" }
prop Email { type "email" placeholder "you@example.com" }
prop Number { type "number" min 0 }

enum Roles {
  ADMIN "Admin"
  MANAGER "Manager"
  USER "User"
}

type Address @label("Address" "Addresses") {
  street   String   @field.input(Text) @is.required @list.hide
  city     String   @field.input(Text) @is.required
  country  String   @field.select @list.text("uppercase")
  postal   String?  @field.input(Text)
}

model User! @label("User" "Users") @icon("user") {
  id        String    @label("ID") @id @default("nanoid(20)")
  username  String    @label("Username") @searchable @field.input(Text)
  email     String    @label("Email") @unique @field.input(Email) @is.email
  age       Number?   @min(0) @max(150) @field.number({ min 0 max 150 step 1 })
  role      Roles     @label("Role") @default("USER")
  address   Address?  @label("Address")
  tags      String[]  @label("Tags")
  created   Date      @label("Created") @default("now()") @sortable
}"#;

fn generate_models(count: usize) -> String {
    let mut source = String::from("prop Text { type \"text\" }\n");
    for i in 0..count {
        source.push_str(&format!(
            "model Model{i} @label(\"Model {i}\") {{\n  id String @id\n  name String @field.input(Text) @is.required\n  rank Number @default({i})\n}}\n"
        ));
    }
    source
}

// ============================================================================
// Tokenizer Benchmarks
// ============================================================================

fn bench_tokenize_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize_by_size");

    for (name, source) in [
        ("tiny", TINY_IDEA),
        ("small", SMALL_IDEA),
        ("medium", MEDIUM_IDEA),
    ] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| tokenize(black_box(src), "bench.idea"));
        });
    }

    group.finish();
}

fn bench_tokenize_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize_model_scaling");

    for size in [10, 50, 100] {
        let source = generate_models(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| tokenize(black_box(src), "bench.idea"));
        });
    }

    group.finish();
}

// ============================================================================
// Compiler Benchmarks
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, source) in [("small", SMALL_IDEA), ("medium", MEDIUM_IDEA)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| parse(black_box(src)));
        });
    }

    group.finish();
}

fn bench_finalize_with_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("finalize_with_json_serialization");

    for (name, source) in [("small", SMALL_IDEA), ("medium", MEDIUM_IDEA)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| {
                let schema = finalize(black_box(src)).ok()?;
                schema.to_json().ok()
            });
        });
    }

    group.finish();
}

fn bench_finalize_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("finalize_model_scaling");

    for size in [10, 50, 100] {
        let source = generate_models(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| finalize(black_box(src)));
        });
    }

    group.finish();
}

criterion_group!(tokenize_benches, bench_tokenize_sizes, bench_tokenize_scaling);
criterion_group!(
    compile_benches,
    bench_parse,
    bench_finalize_with_serialization,
    bench_finalize_scaling
);
criterion_main!(tokenize_benches, compile_benches);
