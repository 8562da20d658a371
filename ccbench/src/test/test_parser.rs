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

use super::{example_addrs, scratch_dir};
use crate::parser::*;
use crate::telemetry::is_monotonic;
use crate::Error;
use assert_approx_eq::assert_approx_eq;
use chrono::NaiveDate;

const TCPPROBE: &str = "\
3.010497418 10.0.0.1:39815 10.0.0.2:5001 32 0x5c5b0a5c 0x5c5a6e1c 10 2147483647 29312 40 29312
3.010501000 10.0.0.2:5001 10.0.0.1:39815 32 0x1c3d2e4f 0x1c3d2e4f 10 2147483647 29312 40 29312
3.110497418 10.0.0.1:39815 10.0.0.2:5001 1448 0x5c5b0b5c 0x5c5a6e1c 12 2147483647 29312 40 29312
253.200000000 10.0.0.3:41234 10.0.0.4:5001 32 0x7a7a0000 0x7a7a0000 10 2147483647 29312 40 29312
253.700000000 10.0.0.3:41234 10.0.0.4:5001 1448 0x7a7a0100 0x7a7a0000 11 2147483647 29312 40 29312
254.010497418 10.0.0.1:39815 10.0.0.2:5001 1448 0x5c5c0b5c 0x5c5b6e1c 40
";

const IPERF_H1: &str = "\
20210105123456,10.0.0.1,39816,10.0.0.2,5001,3,0.0-1.0,1245184,9961472
20210105123457,10.0.0.1,39816,10.0.0.2,5001,3,1.0-2.0,2500000,20000000
20210105123457,10.0.0.1,39816,10.0.0.2,5001,3,2.0-3.0,3750000,30000000
20210105123459,10.0.0.1,39816,10.0.0.2,5001,3,3.0-4.0,5000000,40000000
20210105123459,10.0.0.1,39816,10.0.0.2,5001,3,0.0-4.0,12495184,24990368
";

#[test]
fn tcpprobe_relative_time() {
    let data = parse_tcpprobe(TCPPROBE.as_bytes(), &example_addrs()).unwrap();

    // the reverse direction (receiver to sender) is dropped
    assert_eq!(data.h1.len(), 3);
    assert_eq!(data.h3.len(), 2);

    // each sender starts at exactly zero
    assert_eq!(data.h1[0].time, 0.0);
    assert_eq!(data.h3[0].time, 0.0);
    assert!(is_monotonic(&data.h1));
    assert!(is_monotonic(&data.h3));

    assert_approx_eq!(data.h1[1].time, 0.1);
    assert_approx_eq!(data.h1[2].time, 251.0);
    assert_approx_eq!(data.h3[1].time, 0.5);

    assert_eq!(data.h1.iter().map(|s| s.cwnd).collect::<Vec<_>>(), vec![10, 12, 40]);
    assert_eq!(data.h3.iter().map(|s| s.cwnd).collect::<Vec<_>>(), vec![10, 11]);
}

#[test]
fn tcpprobe_out_of_order() {
    let input = "\
5.0 10.0.0.1:1 10.0.0.2:5001 32 0x1 0x1 10
6.0 10.0.0.1:1 10.0.0.2:5001 32 0x1 0x1 11
5.5 10.0.0.1:1 10.0.0.2:5001 32 0x1 0x1 12
";
    let data = parse_tcpprobe(input.as_bytes(), &example_addrs()).unwrap();
    assert_eq!(data.h1.len(), 3);
    assert!(is_monotonic(&data.h1));
    assert_eq!(data.h1[0].time, 0.0);
    assert!(data.h3.is_empty());
}

#[test]
fn tcpprobe_records() {
    let line = "3.010497418 10.0.0.1:39815 10.0.0.2:5001 32 0x5c5b0a5c 0x5c5a6e1c 10";
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let headers = csv::StringRecord::from(TCPPROBE_FIELDS.to_vec());
    let record: TcpProbeRecord =
        rdr.records().next().unwrap().unwrap().deserialize(Some(&headers)).unwrap();
    assert_eq!(record.src_addr_port, "10.0.0.1:39815");
    assert_eq!(record.bytes, Some(32));
    assert_eq!(record.next_seq.as_deref(), Some("0x5c5b0a5c"));
    assert_eq!(record.cwnd, 10);
    assert_eq!(record.slow_start, None);
    assert_eq!(record.rwnd, None);
}

#[test]
fn tcpprobe_malformed() {
    let input = "abc 10.0.0.1:39815 10.0.0.2:5001 32 0x1 0x1 10\n";
    match parse_tcpprobe(input.as_bytes(), &example_addrs()) {
        Err(Error::CsvError(_)) => {}
        r => panic!("unexpected result: {:?}", r),
    }

    // the congestion window is required
    let input = "3.0 10.0.0.1:39815 10.0.0.2:5001 32\n";
    assert!(parse_tcpprobe(input.as_bytes(), &example_addrs()).is_err());
}

#[test]
fn tcpprobe_skips_other_flows() {
    // truncated rows of unrelated flows do not abort the parse
    let input = "\
1.0 10.0.0.9:1 10.0.0.2:5001 32
1.5 10.0.0.1:39815 10.0.0.2:5001 32 0x1 0x1 10
2.0 10.0.0.2:5001
2.5 10.0.0.3:41234 10.0.0.4:5001 32 0x1 0x1 11
3.0
";
    let data = parse_tcpprobe(input.as_bytes(), &example_addrs()).unwrap();
    assert_eq!(data.h1.len(), 1);
    assert_eq!(data.h3.len(), 1);
    assert_eq!(data.h1[0].cwnd, 10);
    assert_eq!(data.h3[0].cwnd, 11);
}

#[test]
fn iperf_skips_other_flows() {
    let input = "\
20210105123456,10.0.0.2
20210105123456,10.0.0.1,39816,10.0.0.2,5001,3,0.0-1.0,1,2000000
20210105123457,10.0.0.1,39816,10.0.0.2,5001,3,0.0-1.0,1,2000000
";
    let trace = parse_iperf(input.as_bytes(), "10.0.0.1", TimeOrigin::FirstSample).unwrap();
    assert_eq!(trace.samples.len(), 1);
}

#[test]
fn iperf_collision() {
    let trace = parse_iperf(IPERF_H1.as_bytes(), "10.0.0.1", TimeOrigin::FirstSample).unwrap();

    // the summary is removed
    assert_eq!(trace.samples.len(), 4);
    let times: Vec<f64> = trace.samples.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(trace.collisions, 2);
    assert_eq!(trace.out_of_order, 0);

    assert_approx_eq!(trace.samples[0].mbps, 9.961472);
    assert_approx_eq!(trace.samples[2].mbps, 30.0);

    let summary = trace.summary.unwrap();
    assert_eq!(summary.time, 4.0);
    assert_approx_eq!(summary.mbps, 24.990368);

    let origin = NaiveDate::from_ymd_opt(2021, 1, 5).unwrap().and_hms_opt(12, 34, 56).unwrap();
    assert_eq!(trace.origin, origin);
}

#[test]
fn iperf_never_duplicates() {
    // three reports within the same second
    let input = "\
20210105123456,10.0.0.1,1,10.0.0.2,5001,3,0.0-1.0,1,1000000
20210105123457,10.0.0.1,1,10.0.0.2,5001,3,1.0-2.0,1,2000000
20210105123457,10.0.0.1,1,10.0.0.2,5001,3,2.0-3.0,1,3000000
20210105123457,10.0.0.1,1,10.0.0.2,5001,3,3.0-4.0,1,4000000
20210105123500,10.0.0.1,1,10.0.0.2,5001,3,0.0-4.0,4,2500000
";
    let trace = parse_iperf(input.as_bytes(), "10.0.0.1", TimeOrigin::FirstSample).unwrap();
    let times: Vec<f64> = trace.samples.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(trace.collisions, 1);
    assert_eq!(trace.out_of_order, 1);
    assert_eq!(trace.summary.unwrap().time, 4.0);
}

#[test]
fn iperf_common_origin() {
    let h1 = parse_iperf(IPERF_H1.as_bytes(), "10.0.0.1", TimeOrigin::FirstSample).unwrap();
    // second sender, started 250 seconds later
    let input = "\
20210105123906,10.0.0.3,41234,10.0.0.4,5001,4,0.0-1.0,1,1000000
20210105123907,10.0.0.3,41234,10.0.0.4,5001,4,1.0-2.0,1,2000000
20210105123907,10.0.0.3,41234,10.0.0.4,5001,4,0.0-2.0,2,1500000
";
    let h3 = parse_iperf(input.as_bytes(), "10.0.0.3", TimeOrigin::At(h1.origin)).unwrap();
    assert_eq!(h3.origin, h1.origin);
    let times: Vec<f64> = h3.samples.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![250.0, 251.0]);
}

#[test]
fn iperf_filters_source() {
    let input = "\
20210105123456,10.0.0.2,5001,10.0.0.1,39816,3,0.0-1.0,1,1000000
20210105123456,10.0.0.1,39816,10.0.0.2,5001,3,0.0-1.0,1,2000000
20210105123457,10.0.0.1,39816,10.0.0.2,5001,3,0.0-1.0,1,2000000
";
    let trace = parse_iperf(input.as_bytes(), "10.0.0.1", TimeOrigin::FirstSample).unwrap();
    assert_eq!(trace.samples.len(), 1);
    assert_approx_eq!(trace.samples[0].mbps, 2.0);
}

#[test]
fn iperf_empty() {
    let input = "20210105123456,10.0.0.2,5001,10.0.0.1,39816,3,0.0-1.0,1,1000000\n";
    match parse_iperf(input.as_bytes(), "10.0.0.1", TimeOrigin::FirstSample) {
        Err(Error::EmptyTrace { addr, .. }) => assert_eq!(addr, "10.0.0.1"),
        r => panic!("unexpected result: {:?}", r),
    }
    assert!(parse_iperf("".as_bytes(), "10.0.0.1", TimeOrigin::FirstSample).is_err());
}

#[test]
fn iperf_malformed() {
    let input = "20210105123456,10.0.0.1,39816,10.0.0.2,5001,3,0.0-1.0,1,fast\n";
    assert!(matches!(
        parse_iperf(input.as_bytes(), "10.0.0.1", TimeOrigin::FirstSample),
        Err(Error::CsvError(_))
    ));
    let input = "2021-01-05,10.0.0.1,39816,10.0.0.2,5001,3,0.0-1.0,1,1000000\n";
    assert!(matches!(
        parse_iperf(input.as_bytes(), "10.0.0.1", TimeOrigin::FirstSample),
        Err(Error::InvalidTimestamp(_))
    ));
}

#[test]
fn timestamps() {
    let expected = NaiveDate::from_ymd_opt(2021, 1, 5).unwrap().and_hms_opt(12, 34, 56).unwrap();
    assert_eq!(parse_timestamp("20210105123456").unwrap(), expected);
    assert_eq!(parse_timestamp("20210105123456.789").unwrap(), expected);
    assert!(parse_timestamp("2021010512345").is_err());
    assert!(parse_timestamp("20211305123456").is_err());
    assert!(parse_timestamp("20210105256000").is_err());
    assert!(parse_timestamp("2021010512345x").is_err());
    assert!(parse_timestamp("").is_err());
}

#[test]
fn missing_files() {
    let dir = scratch_dir("missing_files");
    match parse_tcpprobe_file(dir.join("tcpprobe_cubic_21ms.txt"), &example_addrs()) {
        Err(Error::MissingFile(p)) => assert_eq!(p, dir.join("tcpprobe_cubic_21ms.txt")),
        r => panic!("unexpected result: {:?}", r),
    }
    let path = dir.join("iperf_cubic_h1-h2_21ms.txt");
    assert!(matches!(
        parse_iperf_file(&path, "10.0.0.1", TimeOrigin::FirstSample),
        Err(Error::MissingFile(_))
    ));

    // an empty file names the file in the error
    std::fs::write(&path, "").unwrap();
    match parse_iperf_file(&path, "10.0.0.1", TimeOrigin::FirstSample) {
        Err(Error::EmptyTrace { file, .. }) => assert_eq!(file, path),
        r => panic!("unexpected result: {:?}", r),
    }
    std::fs::remove_dir_all(dir).unwrap();
}
