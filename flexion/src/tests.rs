//! flexionのテストモジュール群
//!
//! コンパイラ(トライ構築、シリアライズ、レジストリ)とマッチャーの
//! 動作を検証するテストを含みます。

mod inflect;
