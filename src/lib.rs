// Exchange API server library
// 통합 테스트에서 크레이트 내부 모듈을 사용할 수 있도록 공개
// Exposed so integration tests can use the crate's modules

pub mod domains;
pub mod routes;
pub mod shared;
