//! 도메인 모델.

pub mod cart;
pub mod product;
pub mod role;
pub mod transaction;
pub mod user;
mod validation;
pub mod wallet;

pub use cart::{Cart, CartUpdate, NewCart};
pub use product::{NewProduct, Product, ProductUpdate};
pub use role::Role;
pub use transaction::TransactionEvent;
pub use user::{
    LoginRequest, NewUser, NewUserRecord, PasswordChange, PasswordUpdate, User, UserUpdate,
    UserView,
};
pub use validation::{AMOUNT_SCALE, MAX_AMOUNT_EXCLUSIVE};
pub use wallet::{NewWallet, NewWalletRecord, Wallet, WalletUpdate};
