//! App - アプリケーション層
//!
//! ports を組み合わせて restore の流れを実装します。
//!
//! # 主要コンポーネント
//! - **selector**: Tiller Pod の起動引数から backend を決める
//! - **ReleaseLister**: 候補 release の一覧とデコード（壊れた payload はスキップ）
//! - **ManifestFile**: manifest の一時ファイル（Drop で必ず削除）
//! - **Restorer**: list → 1 件チェック → write → apply → cleanup

pub mod lister;
pub mod manifest_file;
pub mod restore;
pub mod selector;

pub use self::lister::ReleaseLister;
pub use self::manifest_file::ManifestFile;
pub use self::restore::{RestoreReport, Restorer};
pub use self::selector::{select_backend, select_store};
