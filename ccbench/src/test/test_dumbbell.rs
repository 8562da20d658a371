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

use crate::dumbbell::*;

#[test]
fn backbone_queue_scales_with_delay() {
    assert_eq!(LinkShape::backbone(21).max_queue_size, 1722);
    assert_eq!(LinkShape::backbone(81).max_queue_size, 6642);
    assert_eq!(LinkShape::backbone(162).max_queue_size, 13284);
    for delay in [21, 81, 162].iter() {
        assert_eq!(LinkShape::backbone(*delay).max_queue_size, 82 * delay);
        assert_eq!(LinkShape::backbone(*delay).delay, *delay);
    }
}

#[test]
fn access_queue_is_scaled_by_percentage() {
    assert_eq!(LinkShape::access(21).max_queue_size, 88);
    assert_eq!(LinkShape::access(81).max_queue_size, 340);
    assert_eq!(LinkShape::access(162).max_queue_size, 680);
    assert_eq!(LinkShape::access(81).delay, 0);
}

#[test]
fn host_queue() {
    assert_eq!(LinkShape::host(21).max_queue_size, 1680);
    assert_eq!(LinkShape::host(162).max_queue_size, 12960);
    assert_eq!(LinkShape::host(162).delay, 0);
}

#[test]
fn bandwidth_independent_of_delay() {
    for delay in [1, 21, 81, 162, 1000].iter() {
        assert_eq!(LinkShape::backbone(*delay).bw, 984);
        assert_eq!(LinkShape::access(*delay).bw, 252);
        assert_eq!(LinkShape::host(*delay).bw, 960);
    }
}

#[test]
fn dumbbell_structure() {
    let d = Dumbbell::new(81);
    assert_eq!(d.switches, vec!["s1", "s2", "s3", "s4"]);
    assert_eq!(d.hosts, vec!["h1", "h2", "h3", "h4"]);
    assert_eq!(d.links.len(), 7);
    assert_eq!(d.links_of(LinkKind::Backbone).count(), 1);
    assert_eq!(d.links_of(LinkKind::Access).count(), 2);
    assert_eq!(d.links_of(LinkKind::Host).count(), 4);

    let backbone = d.links_of(LinkKind::Backbone).next().unwrap();
    assert_eq!((backbone.a, backbone.b), ("s1", "s2"));
    assert_eq!(backbone.shape.delay_str(), "81ms");

    // every host is attached to exactly one switch
    for host in d.hosts.iter() {
        assert_eq!(d.links.iter().filter(|l| l.a == *host || l.b == *host).count(), 1);
    }
    // senders share s3, receivers share s4
    assert!(d.links.iter().any(|l| l.a == "s3" && l.b == "h1"));
    assert!(d.links.iter().any(|l| l.a == "s3" && l.b == "h3"));
    assert!(d.links.iter().any(|l| l.a == "s4" && l.b == "h2"));
    assert!(d.links.iter().any(|l| l.a == "s4" && l.b == "h4"));
}
