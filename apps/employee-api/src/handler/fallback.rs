//! # フォールバックハンドラ
//!
//! どのルートにも一致しないリクエストと、定義済みのパスに未対応のメソッドで
//! 届いたリクエストを、エラーエンベロープ付きの 404 にする。

use crate::error::ApiError;

pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
