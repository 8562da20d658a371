// CCBench: TCP Congestion Control Experiments in Mininet
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

use crate::params::*;
use crate::Error;
use std::time::Duration;

#[test]
fn default_sweep_order() {
    let sweep = Sweep::default();
    let order: Vec<(String, u32)> =
        sweep.experiments().unwrap().into_iter().map(|p| (p.algorithm, p.delay)).collect();
    assert_eq!(
        order,
        vec![
            ("reno".to_string(), 21),
            ("reno".to_string(), 81),
            ("reno".to_string(), 162),
            ("cubic".to_string(), 21),
            ("cubic".to_string(), 81),
            ("cubic".to_string(), 162),
        ]
    );
    for p in sweep.experiments().unwrap() {
        assert_eq!(p.runtime, 1000);
        assert_eq!(p.stagger_delay, 250);
    }
}

#[test]
fn parameters() {
    let p = ExperimentParameters::new("cubic", 21, 1000, 250).unwrap();
    assert_eq!(p.stagger(), Duration::from_secs(250));
    assert_eq!(p.to_string(), "algorithm=cubic, delay=21ms, runtime=1000s, stagger=250s");
}

#[test]
fn invalid_parameters() {
    assert!(matches!(
        ExperimentParameters::new("", 21, 1000, 250),
        Err(Error::InvalidParameters(_))
    ));
    assert!(matches!(
        ExperimentParameters::new("cu bic", 21, 1000, 250),
        Err(Error::InvalidParameters(_))
    ));
    assert!(matches!(
        ExperimentParameters::new("cubic", 21, 0, 250),
        Err(Error::InvalidParameters(_))
    ));
    // zero stagger and zero delay are fine
    assert!(ExperimentParameters::new("cubic", 0, 10, 0).is_ok());
}

#[test]
fn invalid_sweep() {
    let sweep = Sweep { runtime: 0, ..Default::default() };
    assert!(sweep.experiments().is_err());

    let sweep = Sweep { algorithms: vec![], ..Default::default() };
    assert!(sweep.experiments().unwrap().is_empty());
}
