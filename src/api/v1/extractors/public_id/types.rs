/**
 * Responsibility
 *
 * 主な責務
 *  - リソースごとの「意味付きID型」を宣言する
 *
 * 置くもの
 *  - ItemTag, RequestTag などのタグ型
 *  - type PublicItemId = PublicId<ItemTag> のような alias
 *
 * 置かないもの
 *  - decode ロジック
 *  - extractor 実装
 */
use super::core::PublicId;

/**
 * 以下に pub で列挙するものは、./mod.rs 経由で全て公開されるため注意
 * pub use types::*;
 */
// items
pub enum ItemTag {}
pub type PublicItemId = PublicId<ItemTag>;

// requests
pub enum RequestTag {}
pub type PublicRequestId = PublicId<RequestTag>;
