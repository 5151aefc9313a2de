//! 上游提供方模块
//!
//! 本服务面向两族上游：旧版 `api.php` 端点族（legacy）和社区托管的
//! 工作镜像族（worker / vercel）。两族的响应格式互不兼容，各自走
//! 独立的客户端与规整路径，由解析层决定调用哪一族。

pub mod legacy;
pub mod worker;
