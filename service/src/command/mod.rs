//! [`Command`] definition.

pub mod create_contract;
pub mod create_product;
pub mod create_user;
pub mod delete_product;
pub mod update_contract_status;
pub mod update_product;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_contract::CreateContract, create_product::CreateProduct,
    create_user::CreateUser, delete_product::DeleteProduct,
    update_contract_status::UpdateContractStatus,
    update_product::UpdateProduct,
};
