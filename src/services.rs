pub mod likelihood_service;

pub use likelihood_service::LikelihoodService;
