//! Resolvers over the [`Server`](crate::Server) context.
//!
//! Each submodule adds one group of operations as inherent methods:
//! queries and relation lookups, mutations, and subscriptions.

mod mutation;
mod query;
mod subscription;
