use criterion::{black_box, criterion_group, criterion_main, Criterion};
use encryptcookie::cookies::canonicalcookie::{CookieAttributes, CookieOptions, SameSite};
use encryptcookie::cookies::codec;
use encryptcookie::cookies::jar::EncryptedCookieJar;
use encryptcookie::cookies::store::MemoryCookieStore;
use std::sync::Arc;

fn benchmark_cookie_encode(c: &mut Criterion) {
    let opts = CookieOptions::new()
        .expires(30)
        .path("/")
        .domain("example.com")
        .same_site(SameSite::Strict);
    let attrs = CookieAttributes::new("session", "value with spaces; and semicolons", opts);

    c.bench_function("cookie_encode", |b| {
        b.iter(|| {
            black_box(codec::encode(black_box(&attrs)).ok());
        })
    });
}

fn benchmark_cookie_decode(c: &mut Criterion) {
    // Pre-populate
    let store: String = (0..100)
        .map(|i| format!("cookie{}=val%20{}", i, i))
        .collect::<Vec<_>>()
        .join("; ");

    c.bench_function("cookie_decode_last", |b| {
        b.iter(|| {
            black_box(codec::decode(black_box(&store), black_box("cookie99")));
        })
    });

    c.bench_function("cookie_decode_all", |b| {
        b.iter(|| {
            black_box(codec::decode_all(black_box(&store)));
        })
    });
}

fn benchmark_encrypted_round_trip(c: &mut Criterion) {
    let jar = EncryptedCookieJar::new(Arc::new(MemoryCookieStore::new()));
    let opts = CookieOptions::new();

    c.bench_function("cookie_encrypted_set_get", |b| {
        b.iter(|| {
            jar.set("token", black_box("payload"), true, Some("bench key"), &opts)
                .ok();
            black_box(jar.get("token", true, Some("bench key")).ok());
        })
    });
}

fn benchmark_derive_key(c: &mut Criterion) {
    let jar = EncryptedCookieJar::new(Arc::new(MemoryCookieStore::new()));

    c.bench_function("derive_key_128", |b| {
        b.iter(|| {
            black_box(jar.derive_key(None, None).ok());
        })
    });
}

criterion_group!(
    benches,
    benchmark_cookie_encode,
    benchmark_cookie_decode,
    benchmark_encrypted_round_trip,
    benchmark_derive_key
);
criterion_main!(benches);
