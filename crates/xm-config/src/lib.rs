//! Inbound settings engine: normalization, validation and wire-config generation.
//! 入站设置引擎：规范化、校验与引擎配置生成。
//!
//! ## Workflow / 工作流
//! `Raw settings text` -> `Validate` -> `Canonical settings` -> `Engine wire config`
//! `原始设置文本` -> `校验` -> `规范化设置` -> `引擎配置`
//!
//! Every transform in this crate is a pure, synchronous function of its
//! arguments: no I/O, no global state, no caching. Two consequences are
//! load-bearing for callers:
//!
//! - **Atomicity**: settings are only ever replaced wholesale. A failing
//!   call leaves its inbound byte-identical to before.
//! - **Isolation**: generating config for one inbound can never observe or
//!   influence another, so independent workers need no coordination.
//!
//! ## Key modules / 关键模块
//! - [`mtproto`]: settings validation and canonical rewrite for MTProto
//!   inbounds. MTProto 入站设置的校验与规范化重写。
//! - [`vless`]: key-type resolution, key-tool output parsing and auth
//!   selection for VLESS inbounds.
//! - [`present`]: conversion to the engine's wire-format config object.
//! - [`error`]: the classified error taxonomy shared by the pipeline.

pub mod error;
pub mod json_norm;
pub mod model;
pub mod mtproto;
pub mod present;
pub mod vless;

pub use error::{Result, SettingsError};
pub use model::{validate_inbounds, Inbound, InboundConfig};
pub use present::to_engine_config;
pub use vless::{VlessEncAuth, VlessKeyType};
pub use xm_types::{ErrorKind, Protocol};
