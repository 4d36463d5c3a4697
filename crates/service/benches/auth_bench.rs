use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::service::{AuthService, AuthConfig};
use service::auth::repository::mock::MockCredentialStore;
use service::auth::domain::{RegisterInput, LoginInput};

fn service_with(cfg: AuthConfig, rt: &tokio::runtime::Runtime) -> AuthService<MockCredentialStore> {
    let svc = AuthService::new(Arc::new(MockCredentialStore::default()), cfg).unwrap();
    // pre-create user outside of the benchmark
    let _ = rt.block_on(svc.register(RegisterInput { username: "bench".into(), password: "Benchmark1".into() }));
    svc
}

fn bench_login(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let svc = service_with(AuthConfig::default(), &rt);
    let hardened = service_with(AuthConfig { hardened_login: true, ..AuthConfig::default() }, &rt);

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let resp = rt.block_on(svc.login(LoginInput { username: "bench".into(), password: "Benchmark1".into() })).unwrap();
            assert!(resp.is_success());
        });
    });

    c.bench_function("auth_login_unknown_user", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.login(LoginInput { username: "ghost".into(), password: "Benchmark1".into() })).unwrap();
        });
    });

    // should track auth_login_hardened_wrong_password
    c.bench_function("auth_login_hardened_unknown_user", |b| {
        b.iter(|| {
            let resp = rt.block_on(hardened.login(LoginInput { username: "ghost".into(), password: "Benchmark1".into() })).unwrap();
            assert!(!resp.is_success());
        });
    });

    c.bench_function("auth_login_hardened_wrong_password", |b| {
        b.iter(|| {
            let resp = rt.block_on(hardened.login(LoginInput { username: "bench".into(), password: "Benchmark2".into() })).unwrap();
            assert!(!resp.is_success());
        });
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
