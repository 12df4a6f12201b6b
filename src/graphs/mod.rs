/*
 * SPDX-FileCopyrightText: 2026 The webrank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

pub mod link_graph;

pub mod prelude {
    pub use super::link_graph::{GraphError, LinkGraph};
}
