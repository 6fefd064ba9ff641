// Copyright (c) 2025 The cosi-operator authors
// SPDX-License-Identifier: Apache-2.0

//! # COSI Operator - Container Object Storage Interface control-plane
//!
//! This library implements the split COSI control-plane: a cluster-wide **Controller**
//! that owns user-facing coordination and validation, and a per-driver **Sidecar** that
//! owns driver-RPC-mediated operations. Together they reconcile declarative
//! object-storage records (BucketClaim, Bucket, BucketAccess and their classes) into
//! concrete backend resources created by a vendor driver.
//!
//! ## Overview
//!
//! A user creates a `BucketClaim`; the Controller derives a canonical Bucket name from
//! it, creates an intermediate `Bucket`, and binds the claim. The Sidecar observes
//! Buckets matching its driver name, calls the driver's CreateBucket RPC over a local
//! unix socket, and records per-protocol connection info in Bucket status. A user
//! separately creates a `BucketAccess`; the Controller validates it against its class
//! and referenced claims, then hands the record off to the Sidecar by populating
//! `status.driverName` - the single bit that arbitrates ownership.
//!
//! ## Modules
//!
//! - [`crd`] - Custom Resource Definition types for all COSI resources
//! - [`reconcilers`] - Reconciliation logic for each resource type
//! - [`handoff`] - Controller/Sidecar ownership arbitration for BucketAccess
//! - [`predicate`] - Event-filter predicates that gate reconciliation
//! - [`protocol`] - Translators between driver RPC structs and user-facing `COSI_*` vars
//! - [`proto`] - Vendored driver gRPC protocol definitions
//! - [`rpc`] - Driver RPC bootstrap over the unix socket
//! - [`runner`] - Watch-stream wiring and the reconcile retry loop

pub mod constants;
pub mod crd;
pub mod errors;
pub mod handoff;
pub mod metrics;
pub mod predicate;
pub mod proto;
pub mod protocol;
pub mod reconcilers;
pub mod retry;
pub mod rpc;
pub mod runner;
pub mod telemetry;
