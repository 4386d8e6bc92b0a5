//! 读模型（Read Model）
//!
//! 面向查询优化的用户存储形状与访问协议：
//! - `User`：读模型中的用户记录（含内部字段，如口令摘要，不应直接对外暴露）；
//! - `Profile` / `Role`：按需加载的扩展信息；
//! - `ReadModelRepository`：按候选键查找用户、加载资料与角色的仓储协议；
//! - `InMemoryReadModel`：基于内存的仓储实现（需启用 `inmemory` 特性）。
//!
//! 读模型独立于写路径填充，本模块仅关心“读”。
//!
#[cfg(feature = "inmemory")]
mod inmemory;
mod repository;
mod user;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryReadModel;
pub use repository::ReadModelRepository;
pub use user::{Profile, Role, User};
