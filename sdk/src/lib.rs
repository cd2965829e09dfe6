/*!
 * Client SDK for the referee gateway.
 *
 * Responsibility:
 * - 薄い HTTP client (bearer 付与 / JSON helper)
 * - PDF download stage: レスポンス処理の明示的な pipeline 段。登録した
 *   client だけが対象になる (グローバルな hook では ない)
 */

pub mod client;
pub mod download;

pub use client::{GatewayClient, SdkError};
pub use download::PdfDownloadStage;
